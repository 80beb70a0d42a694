//! Custom-Field Migrator: moves phones, emails and a title that an earlier
//! CRM import left in lead custom fields into proper contact records.

use crate::core::cursor::PageCursor;
use crate::domain::model::{Contact, Email, Lead, Phone};
use crate::domain::ports::CrmApi;
use crate::utils::error::Result;

/// Custom field used as the processed/skip marker; leads carrying it are
/// excluded from the query, which makes re-runs safe.
pub const MIGRATION_FIELD: &str = "Migration completed";
const MARK_MIGRATED: &str = "Yes";
const MARK_SKIPPED: &str = "skipped";

/// Type tag given to every migrated phone and email entry.
const ENTRY_KIND: &str = "office";

const LEAD_FIELDS: &str = "id,display_name,name,contacts,custom";

#[derive(Debug, Clone)]
pub struct CustomFieldConfig {
    /// Without this the run is a dry run: reads and logs only, no writes.
    pub confirmed: bool,
    /// Merge into the lead's first contact instead of creating a new one.
    pub use_existing_contact: bool,
    /// Name given to newly created contacts; empty leaves them unnamed.
    pub new_contact_name: String,
    pub phones_custom_field: String,
    pub emails_custom_field: String,
    pub title_custom_field: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationSummary {
    pub leads_scanned: usize,
    pub contacts_created: usize,
    pub contacts_updated: usize,
    /// Leads marked "skipped" after a failed contact write.
    pub leads_skipped: usize,
    /// Leads with none of the three source fields set; left untouched.
    pub leads_ignored: usize,
}

pub struct CustomFieldMigrator<A: CrmApi> {
    api: A,
    config: CustomFieldConfig,
}

impl<A: CrmApi> CustomFieldMigrator<A> {
    pub fn new(api: A, config: CustomFieldConfig) -> Self {
        Self { api, config }
    }

    /// Leads whose phones source field is set and that carry no completion
    /// marker yet, oldest first.
    fn query(&self) -> String {
        format!(
            "\"custom.{}\":* not \"custom.{}\":* sort:created",
            self.config.phones_custom_field, MIGRATION_FIELD
        )
    }

    pub async fn run(&self) -> Result<MigrationSummary> {
        let mut summary = MigrationSummary::default();
        let mut cursor = PageCursor::new();
        let mut has_more = true;
        let query = self.query();

        while has_more {
            let page = self
                .api
                .list_leads(&query, cursor.skip(), LEAD_FIELDS)
                .await?;
            let page_len = page.data.len();
            let mut removed = 0;

            for lead in &page.data {
                summary.leads_scanned += 1;
                if self.migrate_lead(lead, &mut summary).await? {
                    removed += 1;
                }
            }

            cursor.advance(page_len, removed);
            has_more = page.has_more;
        }

        Ok(summary)
    }

    /// Migrate a single lead. Returns whether a completion marker was
    /// written, i.e. whether the lead left the query result set.
    async fn migrate_lead(&self, lead: &Lead, summary: &mut MigrationSummary) -> Result<bool> {
        let fields = SourceFields::from_lead(lead, &self.config);
        if fields.is_empty() {
            tracing::debug!("{}: no source fields set, leaving untouched", lead.id);
            summary.leads_ignored += 1;
            return Ok(false);
        }

        tracing::info!(
            "{} ({}): phones {:?}, emails {:?}, title {:?}",
            lead.id,
            lead.name.as_deref().unwrap_or(""),
            fields.phones,
            fields.emails,
            fields.title
        );

        let contact = self.target_contact(lead, &fields);

        match self.persist_contact(&contact).await {
            Ok(created) => {
                if created {
                    summary.contacts_created += 1;
                } else {
                    summary.contacts_updated += 1;
                }
                self.mark_lead(&lead.id, MARK_MIGRATED).await
            }
            Err(err) if err.is_api_error() => {
                tracing::warn!("{}: contact write failed: {}", lead.id, err);
                summary.leads_skipped += 1;
                self.mark_lead(&lead.id, MARK_SKIPPED).await
            }
            Err(err) => Err(err),
        }
    }

    /// The contact the custom-field data is merged into: the lead's first
    /// contact when reuse is requested and one exists, otherwise a fresh
    /// shell bound to the lead.
    fn target_contact(&self, lead: &Lead, fields: &SourceFields) -> Contact {
        let mut contact = if self.config.use_existing_contact && !lead.contacts.is_empty() {
            lead.contacts[0].clone()
        } else {
            Contact {
                lead_id: Some(lead.id.clone()),
                name: (!self.config.new_contact_name.is_empty())
                    .then(|| self.config.new_contact_name.clone()),
                ..Default::default()
            }
        };

        for phone in &fields.phones {
            contact.phones.push(Phone {
                kind: ENTRY_KIND.to_string(),
                phone: phone.clone(),
            });
        }
        for email in &fields.emails {
            contact.emails.push(Email {
                kind: ENTRY_KIND.to_string(),
                email: email.clone(),
            });
        }
        if let Some(title) = &fields.title {
            contact.title = Some(title.clone());
        }
        contact
    }

    /// PUT for contacts that already exist, POST for shells. Returns whether
    /// a new contact was created. Writes are suppressed in dry-run mode.
    async fn persist_contact(&self, contact: &Contact) -> Result<bool> {
        match &contact.id {
            Some(id) => {
                tracing::info!("updating existing contact {}", id);
                if self.config.confirmed {
                    self.api
                        .update_contact(id, &contact.phones, &contact.emails)
                        .await?;
                }
                Ok(false)
            }
            None => {
                tracing::info!("creating a new contact");
                if self.config.confirmed {
                    self.api.create_contact(contact).await?;
                }
                Ok(true)
            }
        }
    }

    /// Write the completion marker. Returns whether the write was actually
    /// issued (dry runs never mutate the query result set). A failure here
    /// propagates; only contact writes are per-lead tolerant.
    async fn mark_lead(&self, lead_id: &str, value: &str) -> Result<bool> {
        tracing::info!("marking {} as '{}'", lead_id, value);
        if !self.config.confirmed {
            return Ok(false);
        }
        self.api
            .set_lead_custom_field(lead_id, MIGRATION_FIELD, value)
            .await?;
        Ok(true)
    }
}

/// The three custom-field values extracted from a lead, parsed into lists.
#[derive(Debug)]
struct SourceFields {
    phones: Vec<String>,
    emails: Vec<String>,
    title: Option<String>,
}

impl SourceFields {
    fn from_lead(lead: &Lead, config: &CustomFieldConfig) -> Self {
        let raw = |field: &str| {
            lead.custom
                .get(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
        };
        let title = raw(&config.title_custom_field);
        Self {
            phones: parse_value_list(raw(&config.phones_custom_field)),
            emails: parse_value_list(raw(&config.emails_custom_field)),
            title: (!title.is_empty()).then(|| title.to_string()),
        }
    }

    fn is_empty(&self) -> bool {
        self.phones.is_empty() && self.emails.is_empty() && self.title.is_none()
    }
}

/// Split a custom-field value into its individual entries.
///
/// Imports store multi-value fields as the string rendering of a list, e.g.
/// `["a@x.com", "b@x.com"]`; anything else is a single value. The encoding
/// has no escaping, so a value containing the literal `", "` sequence splits
/// at it. A value that opens with `["` but does not close with `"]` is not
/// treated as a list.
pub fn parse_value_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    if value.len() >= 4 && value.starts_with("[\"") && value.ends_with("\"]") {
        value[2..value.len() - 2]
            .split("\", \"")
            .map(str::to_string)
            .collect()
    } else {
        vec![value.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_encoded_list() {
        assert_eq!(
            parse_value_list(r#"["a@x.com", "b@x.com"]"#),
            vec!["a@x.com", "b@x.com"]
        );
    }

    #[test]
    fn test_parse_single_value() {
        assert_eq!(parse_value_list("a@x.com"), vec!["a@x.com"]);
    }

    #[test]
    fn test_parse_empty_value() {
        assert!(parse_value_list("").is_empty());
    }

    #[test]
    fn test_parse_single_element_list() {
        assert_eq!(parse_value_list(r#"["+1 555 0100"]"#), vec!["+1 555 0100"]);
    }

    #[test]
    fn test_parse_unterminated_list_is_single_value() {
        assert_eq!(parse_value_list(r#"["a@x.com"#), vec![r#"["a@x.com"#]);
    }

    fn config() -> CustomFieldConfig {
        CustomFieldConfig {
            confirmed: false,
            use_existing_contact: false,
            new_contact_name: String::new(),
            phones_custom_field: "all phones".to_string(),
            emails_custom_field: "all emails".to_string(),
            title_custom_field: "contact title".to_string(),
        }
    }

    fn lead_with_custom(custom: &[(&str, &str)]) -> Lead {
        Lead {
            id: "lead_1".to_string(),
            name: None,
            addresses: vec![],
            contacts: vec![],
            custom: custom
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        }
    }

    #[test]
    fn test_source_fields_all_empty() {
        let lead = lead_with_custom(&[]);
        let fields = SourceFields::from_lead(&lead, &config());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_source_fields_parsed() {
        let lead = lead_with_custom(&[
            ("all phones", r#"["+1", "+2"]"#),
            ("all emails", "a@x.com"),
            ("contact title", "CEO"),
        ]);
        let fields = SourceFields::from_lead(&lead, &config());
        assert_eq!(fields.phones, vec!["+1", "+2"]);
        assert_eq!(fields.emails, vec!["a@x.com"]);
        assert_eq!(fields.title.as_deref(), Some("CEO"));
    }

    #[test]
    fn test_source_fields_ignore_non_string_values() {
        let mut lead = lead_with_custom(&[]);
        lead.custom
            .insert("all phones".to_string(), serde_json::Value::Bool(true));
        let fields = SourceFields::from_lead(&lead, &config());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_target_contact_new_shell() {
        let mut cfg = config();
        cfg.new_contact_name = "Imported Contact".to_string();
        let api = NullApi;
        let migrator = CustomFieldMigrator::new(api, cfg);

        let lead = lead_with_custom(&[("all phones", "+1"), ("contact title", "CTO")]);
        let fields = SourceFields::from_lead(&lead, &migrator.config);
        let contact = migrator.target_contact(&lead, &fields);

        assert!(contact.id.is_none());
        assert_eq!(contact.lead_id.as_deref(), Some("lead_1"));
        assert_eq!(contact.name.as_deref(), Some("Imported Contact"));
        assert_eq!(contact.title.as_deref(), Some("CTO"));
        assert_eq!(contact.phones.len(), 1);
        assert_eq!(contact.phones[0].kind, "office");
        assert_eq!(contact.phones[0].phone, "+1");
    }

    #[test]
    fn test_target_contact_appends_to_existing() {
        let mut cfg = config();
        cfg.use_existing_contact = true;
        let migrator = CustomFieldMigrator::new(NullApi, cfg);

        let mut lead = lead_with_custom(&[("all emails", "b@x.com")]);
        lead.contacts.push(Contact {
            id: Some("cont_1".to_string()),
            emails: vec![Email {
                kind: "direct".to_string(),
                email: "a@x.com".to_string(),
            }],
            ..Default::default()
        });

        let fields = SourceFields::from_lead(&lead, &migrator.config);
        let contact = migrator.target_contact(&lead, &fields);

        assert_eq!(contact.id.as_deref(), Some("cont_1"));
        assert_eq!(contact.emails.len(), 2);
        assert_eq!(contact.emails[1].email, "b@x.com");
        assert_eq!(contact.emails[1].kind, "office");
    }

    /// Port stub for tests that never reach the API.
    struct NullApi;

    #[async_trait::async_trait]
    impl crate::domain::ports::CrmApi for NullApi {
        async fn list_leads(
            &self,
            _query: &str,
            _skip: usize,
            _fields: &str,
        ) -> crate::utils::error::Result<crate::domain::model::LeadPage> {
            unreachable!()
        }
        async fn update_lead_addresses(
            &self,
            _lead_id: &str,
            _addresses: &[crate::domain::model::Address],
        ) -> crate::utils::error::Result<()> {
            unreachable!()
        }
        async fn set_lead_custom_field(
            &self,
            _lead_id: &str,
            _field: &str,
            _value: &str,
        ) -> crate::utils::error::Result<()> {
            unreachable!()
        }
        async fn update_contact(
            &self,
            _contact_id: &str,
            _phones: &[Phone],
            _emails: &[Email],
        ) -> crate::utils::error::Result<()> {
            unreachable!()
        }
        async fn create_contact(&self, _contact: &Contact) -> crate::utils::error::Result<()> {
            unreachable!()
        }
    }
}
