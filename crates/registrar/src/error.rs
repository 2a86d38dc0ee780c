//! Error types for registrar.
//!
//! This module defines the crate-wide error type. Failures talking to the
//! registration API have their own type, [`ApiError`], which is wrapped here
//! when it crosses into the submitter or dashboard.

use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::registration::{Field, RegistrationId};

/// Required fields were left blank; raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The blank required fields, in form order.
    pub missing: Vec<Field>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|field| field.wire_name()).collect();
        write!(f, "required field(s) missing: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// The main error type for registrar operations.
#[derive(Error, Debug)]
pub enum Error {
    // === API Errors ===
    /// The registration API rejected or failed a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    // === Local Validation Errors ===
    /// A form failed local validation.
    #[error("invalid registration: {0}")]
    Validation(#[from] ValidationError),

    /// A field name did not match any editable field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    // === Dashboard Errors ===
    /// No record with this identifier is loaded.
    #[error("no registration with id {0}")]
    UnknownRecord(RegistrationId),

    /// An edit operation was attempted outside edit mode.
    #[error("no registration is being edited")]
    NoActiveEdit,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for registrar operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from the registration API.
    #[must_use]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// Check if this error is a local validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
