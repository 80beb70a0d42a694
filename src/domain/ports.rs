use crate::domain::model::{Address, Contact, Email, LeadPage, Phone};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The CRM API surface the migration jobs depend on. The jobs are generic
/// over this trait; `adapters::close::CloseClient` is the real implementation
/// and tests substitute their own.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Fetch one page of leads matching `query`, starting at `skip`,
    /// restricted to `fields`.
    async fn list_leads(&self, query: &str, skip: usize, fields: &str) -> Result<LeadPage>;

    /// Replace the full address list of a lead.
    async fn update_lead_addresses(&self, lead_id: &str, addresses: &[Address]) -> Result<()>;

    /// Set a single custom field on a lead.
    async fn set_lead_custom_field(&self, lead_id: &str, field: &str, value: &str) -> Result<()>;

    /// Replace phones and emails of an existing contact.
    async fn update_contact(
        &self,
        contact_id: &str,
        phones: &[Phone],
        emails: &[Email],
    ) -> Result<()>;

    /// Create a new contact.
    async fn create_contact(&self, contact: &Contact) -> Result<()>;
}
