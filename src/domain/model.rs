use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A CRM lead, as returned by the query endpoint. Only the fields the jobs
/// ask for via `_fields` are populated; everything else defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// A lead address. Only `country` is ever rewritten; all other fields are
/// carried through the flattened map so a write-back round-trips them intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A person attached to a lead. `id` is present only for contacts that
/// already exist in the CRM; a shell built for creation leaves it unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub emails: Vec<Email>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(rename = "type")]
    pub kind: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
}

/// One page of a paginated lead query.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_preserves_unknown_fields() {
        let json = r#"{"country": "US", "city": "San Francisco", "zipcode": "94107"}"#;
        let mut address: Address = serde_json::from_str(json).unwrap();
        address.country = "CA".to_string();

        let out = serde_json::to_value(&address).unwrap();
        assert_eq!(out["country"], "CA");
        assert_eq!(out["city"], "San Francisco");
        assert_eq!(out["zipcode"], "94107");
    }

    #[test]
    fn test_contact_shell_omits_absent_fields() {
        let contact = Contact {
            lead_id: Some("lead_1".to_string()),
            ..Default::default()
        };
        let out = serde_json::to_value(&contact).unwrap();
        assert!(out.get("id").is_none());
        assert!(out.get("name").is_none());
        assert!(out.get("title").is_none());
        assert_eq!(out["lead_id"], "lead_1");
    }

    #[test]
    fn test_lead_page_decodes_sparse_leads() {
        let json = r#"{"data": [{"id": "lead_1"}], "has_more": false}"#;
        let page: LeadPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(page.data[0].addresses.is_empty());
        assert!(page.data[0].custom.is_empty());
        assert!(!page.has_more);
    }
}
