use crate::adapters::close::DEFAULT_BASE_URL;
use crate::core::country_update::CountryUpdateConfig;
use crate::core::custom_fields::CustomFieldConfig;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_base_url, validate_codes_differ, validate_country_code, validate_non_empty_string,
    validate_required_field, Validate,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "crm-migrate")]
#[command(about = "Batch data-migration jobs against the Close CRM API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Change one address country code to another across all leads
    UpdateCountries(UpdateCountriesArgs),
    /// Move phones/emails/title from lead custom fields into contacts
    MoveCustomFields(MoveCustomFieldsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct UpdateCountriesArgs {
    /// Old country code (ISO alpha-2)
    #[arg(required_unless_present = "list_countries")]
    pub old_code: Option<String>,

    /// New country code (ISO alpha-2)
    #[arg(required_unless_present = "list_countries")]
    pub new_code: Option<String>,

    /// API key
    #[arg(short = 'k', long, required_unless_present = "list_countries")]
    pub api_key: Option<String>,

    /// Without this flag, the job does a dry run without updating any data
    #[arg(short, long)]
    pub confirmed: bool,

    /// List the valid country codes and exit
    #[arg(short, long)]
    pub list_countries: bool,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl UpdateCountriesArgs {
    /// Job configuration with codes normalized to uppercase. Call after
    /// `validate()`.
    pub fn job_config(&self) -> Result<CountryUpdateConfig> {
        let old_code = validate_required_field("old_code", &self.old_code)?;
        let new_code = validate_required_field("new_code", &self.new_code)?;
        Ok(CountryUpdateConfig {
            old_code: old_code.to_ascii_uppercase(),
            new_code: new_code.to_ascii_uppercase(),
            confirmed: self.confirmed,
        })
    }
}

impl Validate for UpdateCountriesArgs {
    fn validate(&self) -> Result<()> {
        let old_code = validate_required_field("old_code", &self.old_code)?;
        let new_code = validate_required_field("new_code", &self.new_code)?;
        let api_key = validate_required_field("api_key", &self.api_key)?;

        validate_country_code("old_code", old_code)?;
        validate_country_code("new_code", new_code)?;
        validate_codes_differ(old_code, new_code)?;
        validate_non_empty_string("api_key", api_key)?;
        validate_base_url("base_url", &self.base_url)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
pub struct MoveCustomFieldsArgs {
    /// API key
    #[arg(short = 'k', long)]
    pub api_key: String,

    /// Without this flag, the job does a dry run without updating any data
    #[arg(long)]
    pub confirmed: bool,

    /// Merge into the lead's first contact instead of creating a new one
    #[arg(long = "use_existing_contact")]
    pub use_existing_contact: bool,

    /// Name given to newly created contacts
    #[arg(long = "new_contact_name", default_value = "")]
    pub new_contact_name: String,

    /// Custom field containing the phones to move
    #[arg(long = "phones_custom_field", default_value = "all phones")]
    pub phones_custom_field: String,

    /// Custom field containing the emails to move
    #[arg(long = "emails_custom_field", default_value = "all emails")]
    pub emails_custom_field: String,

    /// Custom field containing the contact's title
    #[arg(long = "title_custom_field", default_value = "contact title")]
    pub title_custom_field: String,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl MoveCustomFieldsArgs {
    pub fn job_config(&self) -> CustomFieldConfig {
        CustomFieldConfig {
            confirmed: self.confirmed,
            use_existing_contact: self.use_existing_contact,
            new_contact_name: self.new_contact_name.clone(),
            phones_custom_field: self.phones_custom_field.clone(),
            emails_custom_field: self.emails_custom_field.clone(),
            title_custom_field: self.title_custom_field.clone(),
        }
    }
}

impl Validate for MoveCustomFieldsArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", &self.api_key)?;
        validate_non_empty_string("phones_custom_field", &self.phones_custom_field)?;
        validate_non_empty_string("emails_custom_field", &self.emails_custom_field)?;
        validate_non_empty_string("title_custom_field", &self.title_custom_field)?;
        validate_base_url("base_url", &self.base_url)?;
        Ok(())
    }
}
