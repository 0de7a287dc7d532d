//! HTTP API handlers for taxform-api

pub mod error;
pub mod forms;
pub mod health;
pub mod report;

pub use error::ApiError;
pub use forms::{create_tax_form, list_tax_forms, update_tax_form};
pub use health::health_routes;
pub use report::generate_report;
