//! Registration records exchanged with the registration API.
//!
//! A [`Registration`] is one participant's sign-up data plus the identifier
//! assigned by the API. A [`RegistrationForm`] is the same data without an
//! identifier, used as the create payload and as the submitter's form state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Opaque identifier assigned by the registration API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegistrationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegistrationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An editable field of a registration.
///
/// The identifier is deliberately absent: it is assigned by the API and
/// never edited locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Participant's full name (required on create).
    FullName,
    /// Contact email (required on create).
    Email,
    /// Contact phone number.
    Phone,
    /// Age as entered, integer-like text.
    Age,
    /// Gender, usually "Male" or "Female".
    Gender,
    /// Preferred meet-up area.
    MeetupArea,
    /// Free-text message.
    Message,
}

impl Field {
    /// All editable fields, in form order.
    pub const ALL: [Self; 7] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Age,
        Self::Gender,
        Self::MeetupArea,
        Self::Message,
    ];

    /// The JSON name of this field on the wire.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::MeetupArea => "meetupArea",
            Self::Message => "message",
        }
    }

    /// Column heading used when rendering the participants table.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::MeetupArea => "Meet-up Area",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts the wire name (`meetupArea`) or its snake_case spelling
    /// (`meetup_area`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullName" | "full_name" => Ok(Self::FullName),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            "meetupArea" | "meetup_area" => Ok(Self::MeetupArea),
            "message" => Ok(Self::Message),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

/// Sign-up data without an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Participant's full name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: String,
    /// Contact email.
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    /// Contact phone number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    /// Age as entered; the API may hand it back as a JSON number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    /// Gender as entered.
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,
    /// Preferred meet-up area.
    #[serde(default, deserialize_with = "lenient_text")]
    pub meetup_area: String,
    /// Free-text message.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
}

impl RegistrationForm {
    /// Read a field's current value.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Age => &self.age,
            Field::Gender => &self.gender,
            Field::MeetupArea => &self.meetup_area,
            Field::Message => &self.message,
        }
    }

    /// Overwrite a field's value. No validation is applied.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Age => &mut self.age,
            Field::Gender => &mut self.gender,
            Field::MeetupArea => &mut self.meetup_area,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// Required fields that are blank, in form order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<Field> {
        [Field::FullName, Field::Email]
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// A registration record as stored by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Identifier assigned by the API.
    #[serde(rename = "_id")]
    pub id: RegistrationId,
    /// The participant's data.
    #[serde(flatten)]
    pub details: RegistrationForm,
}

impl Registration {
    /// Build a record from an identifier and form data.
    #[must_use]
    pub fn new(id: impl Into<RegistrationId>, details: RegistrationForm) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }

    /// Read a field's current value.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        self.details.get(field)
    }

    /// Overwrite a field's value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.details.set(field, value);
    }
}

/// Scalars the API may return where text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// Decode a text field that may be missing, `null`, a number, or a string.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(LooseScalar::Text(text)) => text,
        Some(LooseScalar::Integer(n)) => n.to_string(),
        Some(LooseScalar::Float(n)) => n.to_string(),
        Some(LooseScalar::Bool(b)) => b.to_string(),
    })
}
