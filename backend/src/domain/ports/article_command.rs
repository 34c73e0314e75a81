//! Driving ports for article use-cases.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, Error, Identity, Tombstone,
};

/// Article mutations on behalf of a resolved identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Create an article authored by `author`.
    async fn create(&self, author: &Identity, draft: ArticleDraft) -> Result<Article, Error>;

    /// Update an article the caller authored.
    async fn update(
        &self,
        caller: &Identity,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> Result<Article, Error>;

    /// Delete an article the caller authored, leaving a tombstone.
    async fn delete(&self, caller: &Identity, id: ArticleId) -> Result<Tombstone, Error>;
}

/// Article reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// One page of articles.
    async fn list(&self, filter: ArticleFilter, page: PageRequest) -> Result<Page<Article>, Error>;

    /// One article or `NotFound`.
    async fn get(&self, id: ArticleId) -> Result<Article, Error>;
}
