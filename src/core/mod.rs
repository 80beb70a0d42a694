pub mod countries;
pub mod country_update;
pub mod cursor;
pub mod custom_fields;

pub use crate::domain::model::{Address, Contact, Email, Lead, LeadPage, Phone};
pub use crate::domain::ports::CrmApi;
pub use crate::utils::error::Result;
