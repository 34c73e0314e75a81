//! Article categories.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::Error;

/// Maximum length of a category name or slug.
pub const CATEGORY_FIELD_MAX: usize = 100;

/// Validation failures for category input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidSlug,
}

impl From<CategoryValidationError> for Error {
    fn from(value: CategoryValidationError) -> Self {
        let field = match &value {
            CategoryValidationError::Empty { field }
            | CategoryValidationError::TooLong { field, .. } => *field,
            CategoryValidationError::InvalidSlug => "slug",
        };
        Self::invalid_request(value.to_string()).with_details(json!({ "field": field }))
    }
}

/// Database-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryId(pub i32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    #[schema(value_type = i32)]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    /// Validate raw category fields.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, CategoryValidationError> {
        let name = bounded("name", name.into())?;
        let slug = bounded("slug", slug.into())?;
        let slug_ok = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !slug_ok {
            return Err(CategoryValidationError::InvalidSlug);
        }
        Ok(Self {
            name,
            slug,
            description,
        })
    }
}

fn bounded(field: &'static str, value: String) -> Result<String, CategoryValidationError> {
    if value.trim().is_empty() {
        return Err(CategoryValidationError::Empty { field });
    }
    if value.chars().count() > CATEGORY_FIELD_MAX {
        return Err(CategoryValidationError::TooLong {
            field,
            max: CATEGORY_FIELD_MAX,
        });
    }
    Ok(value)
}
