//! Registered identities and their validated building blocks.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::Error;

/// Validation errors raised while building identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    InvalidId,
    EmptyName { field: &'static str },
    InvalidNameCharacters { field: &'static str },
    InvalidEmail,
    EmptyPassword,
}

impl IdentityValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "user_id",
            Self::EmptyName { field } | Self::InvalidNameCharacters { field } => field,
            Self::InvalidEmail => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName { field } => write!(f, "{field} must not be empty"),
            Self::InvalidNameCharacters { field } => {
                write!(f, "{field} should contain only letters")
            }
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

impl From<IdentityValidationError> for Error {
    fn from(value: IdentityValidationError) -> Self {
        let field = value.field();
        Self::invalid_request(value.to_string()).with_details(json!({ "field": field }))
    }
}

/// Stable identity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated text form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address used as the login key.
///
/// Stored exactly as supplied apart from surrounding whitespace; lookups are
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IdentityValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static PERSON_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn person_name_regex() -> &'static Regex {
    PERSON_NAME_RE.get_or_init(|| {
        Regex::new(r"^[а-яА-Яa-zA-Z\-]+$")
            .unwrap_or_else(|error| panic!("person name regex failed to compile: {error}"))
    })
}

/// A given name or surname: Latin or Cyrillic letters and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate `raw` as the value of `field`.
    pub fn new(field: &'static str, raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyName { field });
        }
        if !person_name_regex().is_match(&raw) {
            return Err(IdentityValidationError::InvalidNameCharacters { field });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only identity snapshot handed to callers.
///
/// The credential hash is deliberately absent; see [`StoredIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[serde(rename = "user_id")]
    pub id: UserId,
    #[schema(value_type = String, example = "Ada")]
    pub name: PersonName,
    #[schema(value_type = String, example = "Lovelace")]
    pub surname: PersonName,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Identity as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdentity {
    pub identity: Identity,
    pub credential_hash: String,
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationDraft {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::RegistrationDraft;
    ///
    /// let draft = RegistrationDraft::try_from_parts("Ada", "Lovelace", "ada@example.com", "pw1")
    ///     .expect("valid draft");
    /// assert_eq!(draft.email.as_ref(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, IdentityValidationError> {
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            name: PersonName::new("name", name)?,
            surname: PersonName::new("surname", surname)?,
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Plaintext password, cleared from memory when the draft is dropped.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
