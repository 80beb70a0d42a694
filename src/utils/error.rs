use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    /// Error response from the CRM API. The custom-field migrator catches
    /// this variant per lead; everywhere else it terminates the run.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

impl MigrateError {
    pub fn is_api_error(&self) -> bool {
        matches!(self, MigrateError::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
