//! The registration API collaborator.
//!
//! [`RegistrationApi`] is the port the submitter and dashboard talk through.
//! [`HttpRegistrationApi`] implements it over HTTP with `reqwest`.
//!
//! | Operation | Method | Path                      |
//! |-----------|--------|---------------------------|
//! | list      | GET    | `/api/registrations`      |
//! | create    | POST   | `/api/registrations`      |
//! | update    | PUT    | `/api/registrations/{id}` |
//! | delete    | DELETE | `/api/registrations/{id}` |

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::registration::{Registration, RegistrationForm, RegistrationId};

pub use http::HttpRegistrationApi;

/// Errors raised while talking to the registration API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the API or no response came back.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Target URL.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The configured request timeout elapsed.
    #[error("request to {url} timed out: {message}")]
    Timeout {
        /// Target URL.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("{method} {url} returned status {status}: {body}")]
    Status {
        /// HTTP method of the request.
        method: String,
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Compacted preview of the response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response from {url}: {message}")]
    Decode {
        /// Target URL.
        url: String,
        /// Description of the decode failure.
        message: String,
    },

    /// The configured base URL cannot carry the API paths.
    #[error("invalid API URL {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },
}

impl ApiError {
    /// HTTP status of an API-level failure, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request failed before the API answered.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Port for the remote store of registrations.
///
/// Every method is a single request with no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Fetch every registration.
    async fn list(&self) -> Result<Vec<Registration>, ApiError>;

    /// Create a registration from form data.
    ///
    /// Returns the created record when the API echoes one back, or `None`
    /// for a bare acknowledgement.
    async fn create(&self, form: &RegistrationForm) -> Result<Option<Registration>, ApiError>;

    /// Replace a registration in full, keyed by its identifier.
    ///
    /// Returns the stored record when the API echoes one back.
    async fn update(&self, record: &Registration) -> Result<Option<Registration>, ApiError>;

    /// Delete a registration.
    async fn delete(&self, id: &RegistrationId) -> Result<(), ApiError>;
}
