//! # Tax-Form Common Library
//!
//! Shared code for the tax-form declaration service:
//! - Database models and schema initialization
//! - Error taxonomy
//! - Configuration loading
//! - Status-code label resolution

pub mod config;
pub mod db;
pub mod error;
pub mod status;

pub use error::{Error, Result};
pub use status::resolve_status;
