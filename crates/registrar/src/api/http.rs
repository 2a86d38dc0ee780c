//! Reqwest-backed registration API adapter.
//!
//! This adapter owns transport details only: URL construction, request
//! serialisation, status and transport error mapping, and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, RegistrationApi};
use crate::registration::{Registration, RegistrationForm, RegistrationId};

/// Path segments of the registrations collection below the base URL.
const COLLECTION_PATH: [&str; 2] = ["api", "registrations"];

/// Registration API client that talks HTTP to one base URL.
#[derive(Debug, Clone)]
pub struct HttpRegistrationApi {
    client: Client,
    collection: Url,
}

impl HttpRegistrationApi {
    /// Build a client for the API rooted at `base_url`.
    ///
    /// Without a `timeout` requests wait as long as the transport allows.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry path segments or the
    /// reqwest client cannot be constructed.
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|error| ApiError::Transport {
            url: base_url.to_string(),
            message: error.to_string(),
        })?;
        Self::with_client(base_url, client)
    }

    /// Build an adapter around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry path segments.
    pub fn with_client(base_url: &Url, client: Client) -> Result<Self, ApiError> {
        let collection = collection_url(base_url)?;
        Ok(Self { client, collection })
    }

    /// URL of the registrations collection.
    #[must_use]
    pub fn collection(&self) -> &Url {
        &self.collection
    }

    /// URL of a single registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection URL cannot carry path segments.
    pub fn record_url(&self, id: &RegistrationId) -> Result<Url, ApiError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.collection.to_string(),
            })?
            .push(id.as_str());
        Ok(url)
    }

    /// Send a request and return the body of a success response.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder + Send,
    ) -> Result<Vec<u8>, ApiError> {
        let request = prepare(self.client.request(method.clone(), url.clone()))
            .header(reqwest::header::ACCEPT, "application/json");
        let response = request
            .send()
            .await
            .map_err(|error| map_transport_error(&url, &error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&url, &error))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        if !status.is_success() {
            return Err(map_status_error(&method, &url, status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    #[instrument(skip(self), fields(url = %self.collection))]
    async fn list(&self) -> Result<Vec<Registration>, ApiError> {
        debug!("Sending request");
        let url = self.collection.clone();
        let body = self.execute(Method::GET, url.clone(), |request| request).await?;
        parse_list(&url, &body)
    }

    #[instrument(skip(self, form), fields(url = %self.collection))]
    async fn create(&self, form: &RegistrationForm) -> Result<Option<Registration>, ApiError> {
        debug!("Sending request");
        let body = self
            .execute(Method::POST, self.collection.clone(), |request| {
                request.json(form)
            })
            .await?;
        Ok(parse_echo(&body))
    }

    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn update(&self, record: &Registration) -> Result<Option<Registration>, ApiError> {
        debug!("Sending request");
        let url = self.record_url(&record.id)?;
        let body = self
            .execute(Method::PUT, url, |request| request.json(record))
            .await?;
        Ok(parse_echo(&body))
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn delete(&self, id: &RegistrationId) -> Result<(), ApiError> {
        debug!("Sending request");
        let url = self.record_url(id)?;
        self.execute(Method::DELETE, url, |request| request).await?;
        Ok(())
    }
}

/// Append the collection path to `base_url`, tolerating a trailing slash.
fn collection_url(base_url: &Url) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl {
            url: base_url.to_string(),
        })?
        .pop_if_empty()
        .extend(COLLECTION_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn parse_list(url: &Url, body: &[u8]) -> Result<Vec<Registration>, ApiError> {
    serde_json::from_slice(body).map_err(|error| ApiError::Decode {
        url: url.to_string(),
        message: format!("expected a JSON array of registrations: {error}"),
    })
}

/// Decode an echoed record, treating anything else as a bare acknowledgement.
fn parse_echo(body: &[u8]) -> Option<Registration> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(record) => Some(record),
        Err(error) => {
            debug!(error = %error, "Response is not a registration; treating as acknowledgement");
            None
        }
    }
}

fn map_transport_error(url: &Url, error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        ApiError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn map_status_error(method: &Method, url: &Url, status: StatusCode, body: &[u8]) -> ApiError {
    ApiError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: body_preview(body),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
