pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::close::CloseClient;
pub use config::{Cli, Command};
pub use core::country_update::{CountryCodeUpdater, CountryUpdateConfig, UpdateSummary};
pub use core::custom_fields::{CustomFieldConfig, CustomFieldMigrator, MigrationSummary};
pub use utils::error::{MigrateError, Result};
