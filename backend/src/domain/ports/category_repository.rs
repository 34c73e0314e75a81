//! Port for category persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Category, CategoryDraft, CategoryId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "category repository query failed: {message}",
        /// Another category already uses this slug.
        DuplicateSlug { slug: String } => "category slug {slug} already exists",
        /// Another category already uses this name.
        DuplicateName { name: String } => "category name {name} already exists",
    }
}

/// Category storage.
///
/// Deleting a category never inspects articles that reference it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return it with its assigned id.
    async fn insert(
        &self,
        draft: &CategoryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Category, CategoryRepositoryError>;

    /// All categories ordered by id.
    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Fetch one category.
    async fn find_by_id(&self, id: CategoryId)
    -> Result<Option<Category>, CategoryRepositoryError>;

    /// Remove a category; `false` when it did not exist.
    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError>;
}
