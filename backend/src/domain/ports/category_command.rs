//! Driving ports for category use-cases.

use async_trait::async_trait;

use crate::domain::{Category, CategoryDraft, CategoryId, Error};

/// Category mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryCommand: Send + Sync {
    /// Create a category; duplicate slug or name is `Conflict`.
    async fn create(&self, draft: &CategoryDraft) -> Result<Category, Error>;

    /// Delete a category; absent ids are `NotFound`.
    async fn delete(&self, id: CategoryId) -> Result<(), Error>;
}

/// Category reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryQuery: Send + Sync {
    /// Every category.
    async fn list(&self) -> Result<Vec<Category>, Error>;

    /// One category or `NotFound`.
    async fn get(&self, id: CategoryId) -> Result<Category, Error>;
}
