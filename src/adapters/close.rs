//! Close CRM API client.

use crate::domain::model::{Address, Contact, Email, LeadPage, Phone};
use crate::domain::ports::CrmApi;
use crate::utils::error::{MigrateError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};

pub const DEFAULT_BASE_URL: &str = "https://api.close.com/api/v1";

/// Thin reqwest wrapper over the Close JSON API. Authenticates with the API
/// key as the basic-auth username; the base URL is overridable so tests can
/// point it at a mock server.
pub struct CloseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CloseClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map non-2xx responses to the typed API error, decoding the CRM's
    /// `{"error": "..."}` envelope when the body carries one.
    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .unwrap_or(body);
        tracing::debug!("API request failed: {} - {}", status, message);
        Err(MigrateError::Api { status, message })
    }

    async fn put(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        tracing::debug!("PUT {}", path);
        let response = self
            .client
            .put(self.url(path))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        tracing::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CrmApi for CloseClient {
    async fn list_leads(&self, query: &str, skip: usize, fields: &str) -> Result<LeadPage> {
        tracing::debug!("GET lead/ _skip={}", skip);
        let skip = skip.to_string();
        let response = self
            .client
            .get(self.url("lead/"))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&[("query", query), ("_skip", skip.as_str()), ("_fields", fields)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let page = response.json::<LeadPage>().await?;
        Ok(page)
    }

    async fn update_lead_addresses(&self, lead_id: &str, addresses: &[Address]) -> Result<()> {
        self.put(
            &format!("lead/{}/", lead_id),
            &serde_json::json!({ "addresses": addresses }),
        )
        .await
    }

    async fn set_lead_custom_field(&self, lead_id: &str, field: &str, value: &str) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(
            format!("custom.{}", field),
            serde_json::Value::String(value.to_string()),
        );
        self.put(
            &format!("lead/{}/", lead_id),
            &serde_json::Value::Object(body),
        )
        .await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        phones: &[Phone],
        emails: &[Email],
    ) -> Result<()> {
        self.put(
            &format!("contact/{}/", contact_id),
            &serde_json::json!({ "phones": phones, "emails": emails }),
        )
        .await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<()> {
        self.post("contact/", &serde_json::to_value(contact)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_list_leads_sends_pagination_params() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/lead/")
                .query_param("query", "* sort:created")
                .query_param("_skip", "40")
                .query_param("_fields", "id,addresses");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "data": [{"id": "lead_1", "addresses": [{"country": "US"}]}],
                    "has_more": true
                }));
        });

        let client = CloseClient::new("key", &server.base_url());
        let page = client
            .list_leads("* sort:created", 40, "id,addresses")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(page.data.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.data[0].addresses[0].country, "US");
    }

    #[tokio::test]
    async fn test_error_envelope_surfaces_as_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/contact/");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"error": "Invalid phone number"}));
        });

        let client = CloseClient::new("key", &server.base_url());
        let err = client
            .create_contact(&Contact::default())
            .await
            .unwrap_err();

        match err {
            MigrateError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid phone number");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_verbatim() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/lead/");
            then.status(503).body("service unavailable");
        });

        let client = CloseClient::new("key", &server.base_url());
        let err = client.list_leads("*", 0, "id").await.unwrap_err();

        match err {
            MigrateError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "service unavailable");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_lead_custom_field_body() {
        let server = MockServer::start();
        let put_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/lead/lead_1/")
                .json_body(serde_json::json!({"custom.Migration completed": "Yes"}));
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = CloseClient::new("key", &server.base_url());
        client
            .set_lead_custom_field("lead_1", "Migration completed", "Yes")
            .await
            .unwrap();

        put_mock.assert();
    }
}
