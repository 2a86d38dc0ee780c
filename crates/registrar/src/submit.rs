//! The public registration form.
//!
//! A [`Submitter`] holds the form being filled in. Submitting validates the
//! required fields locally, sends exactly one create request, and clears the
//! form only once the API has acknowledged it.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::api::RegistrationApi;
use crate::error::{Result, ValidationError};
use crate::registration::{Field, Registration, RegistrationForm};

/// Message shown after a successful submission.
pub const SUCCESS_MESSAGE: &str = "Registration submitted!";

/// Message shown after a failed submission.
pub const FAILURE_MESSAGE: &str = "Error submitting registration";

/// Loose `local@domain.tld` shape used only to warn about likely typos.
fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Whether `email` looks like an email address.
///
/// This is a hint only; submission is never blocked on it.
#[must_use]
pub fn looks_like_email(email: &str) -> bool {
    email_pattern().map_or(true, |pattern| pattern.is_match(email.trim()))
}

/// Check the fields a registration cannot be created without.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every blank required field.
pub fn validate(form: &RegistrationForm) -> std::result::Result<(), ValidationError> {
    let missing = form.missing_required();
    if !missing.is_empty() {
        return Err(ValidationError { missing });
    }
    if !looks_like_email(&form.email) {
        warn!(email = %form.email, "Email address looks malformed");
    }
    Ok(())
}

/// Outcome of an acknowledged submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// The created record, when the API echoed it back.
    pub record: Option<Registration>,
}

/// Form state for a single registration.
#[derive(Debug, Clone, Default)]
pub struct Submitter {
    form: RegistrationForm,
}

impl Submitter {
    /// Create a submitter with a blank form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a submitter pre-filled with `form`.
    #[must_use]
    pub fn with_form(form: RegistrationForm) -> Self {
        Self { form }
    }

    /// The current form contents.
    #[must_use]
    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Change one form field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Clear every field back to blank.
    pub fn reset(&mut self) {
        self.form = RegistrationForm::default();
    }

    /// Validate and send the form.
    ///
    /// On success the form is cleared. On any failure the form is left as it
    /// was so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) without
    /// contacting the API when a required field is blank, or
    /// [`Error::Api`](crate::Error::Api) when the create request fails.
    #[instrument(skip_all)]
    pub async fn submit<A>(&mut self, api: &A) -> Result<Submitted>
    where
        A: RegistrationApi + ?Sized,
    {
        validate(&self.form)?;

        match api.create(&self.form).await {
            Ok(record) => {
                info!(
                    id = record.as_ref().map_or("", |r| r.id.as_str()),
                    "Registration submitted"
                );
                self.reset();
                Ok(Submitted { record })
            }
            Err(e) => {
                error!(error = %e, "Registration submission failed");
                Err(e.into())
            }
        }
    }
}
