//! Port for article persistence and the tombstone archive.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, Tombstone, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// The article row no longer exists.
        Missing { id: i32 } => "article {id} does not exist",
        /// The caller did not write the locked article.
        NotAuthor { id: i32 } => "article {id} belongs to another author",
    }
}

/// Article storage plus the write-only tombstone archive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert an article authored by `author`.
    async fn insert(
        &self,
        author: UserId,
        draft: &ArticleDraft,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError>;

    /// Fetch one article.
    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError>;

    /// One page of articles matching `filter`, newest first.
    async fn list(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Page<Article>, ArticleRepositoryError>;

    /// Apply `patch` and refresh `updated_at` if `caller` wrote the article.
    ///
    /// The author check and the write happen under one row lock. Returns
    /// `Missing` when the row vanished since it was read and `NotAuthor` when
    /// `caller` is someone else.
    async fn update(
        &self,
        caller: UserId,
        id: ArticleId,
        patch: &ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError>;

    /// Archive a full snapshot and delete the live row as one atomic unit.
    ///
    /// The row is locked before the author check and the snapshot. If it is
    /// already gone (for example removed by a concurrent delete) the call
    /// returns `Missing`; if `caller` did not write it the call returns
    /// `NotAuthor`. Neither writes anything.
    async fn archive_and_remove(
        &self,
        caller: UserId,
        id: ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<Tombstone, ArticleRepositoryError>;
}
