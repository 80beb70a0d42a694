use crate::core::countries;
use crate::utils::error::{MigrateError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_country_code(field_name: &str, code: &str) -> Result<()> {
    if !countries::is_valid(&code.to_ascii_uppercase()) {
        return Err(MigrateError::InvalidConfigValue {
            field: field_name.to_string(),
            value: code.to_string(),
            reason: "not a valid ISO 3166-1 alpha-2 country code".to_string(),
        });
    }
    Ok(())
}

pub fn validate_codes_differ(old_code: &str, new_code: &str) -> Result<()> {
    if old_code.eq_ignore_ascii_case(new_code) {
        return Err(MigrateError::InvalidConfigValue {
            field: "new_code".to_string(),
            value: new_code.to_string(),
            reason: "old and new country codes must differ".to_string(),
        });
    }
    Ok(())
}

pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MigrateError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MigrateError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MigrateError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MigrateError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| MigrateError::MissingConfig {
        field: field_name.to_string(),
    })
}
