//! Configuration validation
//!
//! Validates run specifications before any scheduler is built.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::validate_config;
