//! Write-only archive of deleted articles.

use chrono::{DateTime, Utc};

use super::{Article, ArticleId, CategoryId, UserId};

/// Snapshot of an article taken at deletion time.
///
/// Tombstones are append-only: exactly one is written per successful delete,
/// inside the same transaction that removes the live row, and the running
/// system never reads them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tombstone {
    pub original_id: ArticleId,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
}

impl Tombstone {
    /// Capture every field of `article` at `deleted_at`.
    #[must_use]
    pub fn capture(article: &Article, deleted_at: DateTime<Utc>) -> Self {
        Self {
            original_id: article.id,
            title: article.title.clone(),
            content: article.content.clone(),
            excerpt: article.excerpt.clone(),
            category_id: article.category_id,
            author_id: article.author_id,
            image_url: article.image_url.clone(),
            is_published: article.is_published,
            created_at: article.created_at,
            updated_at: article.updated_at,
            deleted_at,
        }
    }

    /// Whether this snapshot matches `article` field for field.
    #[must_use]
    pub fn mirrors(&self, article: &Article) -> bool {
        self.original_id == article.id
            && self.title == article.title
            && self.content == article.content
            && self.excerpt == article.excerpt
            && self.category_id == article.category_id
            && self.author_id == article.author_id
            && self.image_url == article.image_url
            && self.is_published == article.is_published
            && self.created_at == article.created_at
            && self.updated_at == article.updated_at
    }
}
