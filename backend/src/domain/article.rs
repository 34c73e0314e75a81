//! Articles, the only mutable resource guarded by ownership.
//!
//! Articles are created by their author and may only be changed or removed
//! by that same author (see [`super::ownership`]). Deletion archives a full
//! snapshot as a [`super::Tombstone`] before the live row disappears.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{CategoryId, Error, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 255;
/// Maximum image URL length in characters.
pub const IMAGE_URL_MAX: usize = 500;

/// Validation failures for article input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl From<ArticleValidationError> for Error {
    fn from(value: ArticleValidationError) -> Self {
        let (ArticleValidationError::Empty { field } | ArticleValidationError::TooLong { field, .. }) =
            &value;
        let field = *field;
        Self::invalid_request(value.to_string()).with_details(json!({ "field": field }))
    }
}

/// Database-assigned article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ArticleId(pub i32);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live article.
///
/// ## Invariants
/// - `author_id` never changes after creation.
/// - `updated_at` is refreshed on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Article {
    #[schema(value_type = i32)]
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[schema(value_type = i32)]
    pub category_id: CategoryId,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new article. The author is supplied by the caller's
/// resolved identity, never by the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
    pub is_published: bool,
}

impl ArticleDraft {
    /// Validate the draft's text fields.
    pub fn validate(self) -> Result<Self, ArticleValidationError> {
        check_title(&self.title)?;
        check_content(&self.content)?;
        check_image_url(self.image_url.as_deref())?;
        Ok(self)
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

impl ArticlePatch {
    /// Validate whichever fields are present.
    pub fn validate(self) -> Result<Self, ArticleValidationError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(content) = &self.content {
            check_content(content)?;
        }
        check_image_url(self.image_url.as_deref())?;
        Ok(self)
    }

    /// Apply the patch to `article`, stamping `updated_at` with `now`.
    pub fn apply_to(self, article: &mut Article, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(excerpt) = self.excerpt {
            article.excerpt = Some(excerpt);
        }
        if let Some(category_id) = self.category_id {
            article.category_id = category_id;
        }
        if let Some(image_url) = self.image_url {
            article.image_url = Some(image_url);
        }
        if let Some(is_published) = self.is_published {
            article.is_published = is_published;
        }
        article.updated_at = now;
    }
}

/// Filters accepted by the article listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub category_id: Option<CategoryId>,
    pub is_published: Option<bool>,
}

impl ArticleFilter {
    /// Whether `article` satisfies every set filter.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.category_id.is_none_or(|id| article.category_id == id)
            && self.is_published.is_none_or(|flag| article.is_published == flag)
    }
}

fn check_title(title: &str) -> Result<(), ArticleValidationError> {
    if title.trim().is_empty() {
        return Err(ArticleValidationError::Empty { field: "title" });
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ArticleValidationError::TooLong {
            field: "title",
            max: TITLE_MAX,
        });
    }
    Ok(())
}

fn check_content(content: &str) -> Result<(), ArticleValidationError> {
    if content.trim().is_empty() {
        return Err(ArticleValidationError::Empty { field: "content" });
    }
    Ok(())
}

fn check_image_url(image_url: Option<&str>) -> Result<(), ArticleValidationError> {
    match image_url {
        Some(url) if url.chars().count() > IMAGE_URL_MAX => Err(ArticleValidationError::TooLong {
            field: "image_url",
            max: IMAGE_URL_MAX,
        }),
        _ => Ok(()),
    }
}
