//! Article use-cases: authoring, listing and ownership-guarded mutation.
//!
//! Every mutation follows the same shape: load the live article, run the
//! ownership guard against the resolved caller, then write. The repository
//! repeats the author check on the locked row inside the write transaction,
//! and a `NotAuthor` answer from it maps to the same `Forbidden` error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::category_service::{CATEGORY_NOT_FOUND, map_category_error};
use crate::domain::ownership::{Mutation, authorize_mutation};
use crate::domain::ports::{
    ArticleCommand, ArticleQuery, ArticleRepository, ArticleRepositoryError, CategoryRepository,
};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, CategoryId, Error, Identity,
    Tombstone,
};

const ARTICLE_NOT_FOUND: &str = "Article not found";

/// Article service implementing [`ArticleCommand`] and [`ArticleQuery`].
#[derive(Clone)]
pub struct ArticleService<A, C> {
    articles: Arc<A>,
    categories: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<A, C> ArticleService<A, C> {
    /// Create a service over the article and category stores.
    pub fn new(articles: Arc<A>, categories: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            categories,
            clock,
        }
    }
}

fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
        ArticleRepositoryError::Missing { .. } => Error::not_found(ARTICLE_NOT_FOUND),
        ArticleRepositoryError::NotAuthor { .. } => Error::forbidden(Mutation::Update.denial()),
    }
}

fn map_mutation_error(error: ArticleRepositoryError, mutation: Mutation) -> Error {
    match error {
        ArticleRepositoryError::NotAuthor { .. } => Error::forbidden(mutation.denial()),
        other => map_article_error(other),
    }
}

impl<A, C> ArticleService<A, C>
where
    A: ArticleRepository,
    C: CategoryRepository,
{
    async fn ensure_category(&self, id: CategoryId) -> Result<(), Error> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(map_category_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(CATEGORY_NOT_FOUND))
    }

    async fn load(&self, id: ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))
    }
}

#[async_trait]
impl<A, C> ArticleCommand for ArticleService<A, C>
where
    A: ArticleRepository,
    C: CategoryRepository,
{
    async fn create(&self, author: &Identity, draft: ArticleDraft) -> Result<Article, Error> {
        let draft = draft.validate()?;
        self.ensure_category(draft.category_id).await?;
        let article = self
            .articles
            .insert(author.id, &draft, self.clock.utc())
            .await
            .map_err(map_article_error)?;
        info!(article_id = %article.id, author_id = %author.id, "article created");
        Ok(article)
    }

    async fn update(
        &self,
        caller: &Identity,
        id: ArticleId,
        patch: ArticlePatch,
    ) -> Result<Article, Error> {
        let patch = patch.validate()?;
        let current = self.load(id).await?;
        authorize_mutation(&current, caller, Mutation::Update)?;
        if let Some(category_id) = patch.category_id
            && category_id != current.category_id
        {
            self.ensure_category(category_id).await?;
        }
        let updated = self
            .articles
            .update(caller.id, id, &patch, self.clock.utc())
            .await
            .map_err(|error| map_mutation_error(error, Mutation::Update))?;
        info!(article_id = %id, "article updated");
        Ok(updated)
    }

    async fn delete(&self, caller: &Identity, id: ArticleId) -> Result<Tombstone, Error> {
        let current = self.load(id).await?;
        authorize_mutation(&current, caller, Mutation::Delete)?;
        let tombstone = self
            .articles
            .archive_and_remove(caller.id, id, self.clock.utc())
            .await
            .map_err(|error| map_mutation_error(error, Mutation::Delete))?;
        info!(article_id = %id, deleted_at = %tombstone.deleted_at, "article archived and removed");
        Ok(tombstone)
    }
}

#[async_trait]
impl<A, C> ArticleQuery for ArticleService<A, C>
where
    A: ArticleRepository,
    C: CategoryRepository,
{
    async fn list(&self, filter: ArticleFilter, page: PageRequest) -> Result<Page<Article>, Error> {
        self.articles
            .list(filter, page)
            .await
            .map_err(map_article_error)
    }

    async fn get(&self, id: ArticleId) -> Result<Article, Error> {
        self.load(id).await
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
