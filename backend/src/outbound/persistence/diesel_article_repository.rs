//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! Update and deletion each run in one transaction: the live row is locked
//! with `SELECT ... FOR UPDATE` and its author compared with the caller
//! before anything is written. Deletion then snapshots the row into
//! `deleted_articles` and removes it. A second transaction racing on the same
//! id blocks on the lock, then sees no row and writes nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncConnection as _, AsyncPgConnection};
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::{Page, PageRequest};

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, CategoryId, Tombstone, UserId,
};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message,
};
use super::models::{ArticleChangeset, ArticleRow, NewArticleRow, NewDeletedArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, deleted_articles};

/// Diesel-backed implementation of the `ArticleRepository` port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    ArticleRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ArticleRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            ArticleRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ArticleRepositoryError::query(message),
    }
}

fn row_to_article(row: ArticleRow) -> Article {
    Article {
        id: ArticleId(row.id),
        title: row.title,
        content: row.content,
        excerpt: row.excerpt,
        category_id: CategoryId(row.category_id),
        author_id: UserId::from(row.author_id),
        image_url: row.image_url,
        is_published: row.is_published,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// `Ok` iff the locked row was written by `caller`.
fn ensure_author(row: &ArticleRow, caller: UserId) -> Result<(), ArticleRepositoryError> {
    if row.author_id == *caller.as_uuid() {
        Ok(())
    } else {
        Err(ArticleRepositoryError::not_author(row.id))
    }
}

async fn lock_row(
    conn: &mut AsyncPgConnection,
    id: ArticleId,
) -> Result<Option<ArticleRow>, diesel::result::Error> {
    articles::table
        .find(id.0)
        .select(ArticleRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()
}

fn tombstone_row(tombstone: &Tombstone) -> NewDeletedArticleRow {
    NewDeletedArticleRow {
        original_id: tombstone.original_id.0,
        title: tombstone.title.clone(),
        content: tombstone.content.clone(),
        excerpt: tombstone.excerpt.clone(),
        category_id: tombstone.category_id.0,
        author_id: *tombstone.author_id.as_uuid(),
        image_url: tombstone.image_url.clone(),
        is_published: tombstone.is_published,
        created_at: tombstone.created_at,
        updated_at: tombstone.updated_at,
        deleted_at: tombstone.deleted_at,
    }
}

fn filtered(filter: ArticleFilter) -> articles::BoxedQuery<'static, Pg> {
    let mut query = articles::table.into_boxed();
    if let Some(category_id) = filter.category_id {
        query = query.filter(articles::category_id.eq(category_id.0));
    }
    if let Some(is_published) = filter.is_published {
        query = query.filter(articles::is_published.eq(is_published));
    }
    query
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(
        &self,
        author: UserId,
        draft: &ArticleDraft,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewArticleRow {
            title: &draft.title,
            content: &draft.content,
            excerpt: draft.excerpt.as_deref(),
            category_id: draft.category_id.0,
            author_id: *author.as_uuid(),
            image_url: draft.image_url.as_deref(),
            is_published: draft.is_published,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(articles::table)
            .values(&row)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_article)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ArticleRow> = articles::table
            .find(id.0)
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_article))
    }

    async fn list(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Page<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ArticleRow> = filtered(filter)
            .select(ArticleRow::as_select())
            .order_by((articles::created_at.desc(), articles::id.desc()))
            .offset(page.offset())
            .limit(page.limit())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(
            rows.into_iter().map(row_to_article).collect(),
            total,
            page,
        ))
    }

    async fn update(
        &self,
        caller: UserId,
        id: ArticleId,
        patch: &ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError> {
        let changeset = ArticleChangeset {
            title: patch.title.as_deref(),
            content: patch.content.as_deref(),
            excerpt: patch.excerpt.as_deref(),
            category_id: patch.category_id.map(|category| category.0),
            image_url: patch.image_url.as_deref(),
            is_published: patch.is_published,
            updated_at: now,
        };
        let changeset = &changeset;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let Some(row) = lock_row(conn, id).await? else {
                    return Ok(Err(ArticleRepositoryError::missing(id.0)));
                };
                if let Err(denied) = ensure_author(&row, caller) {
                    return Ok(Err(denied));
                }
                let updated = diesel::update(articles::table.find(id.0))
                    .set(changeset)
                    .returning(ArticleRow::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(Ok(row_to_article(updated)))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?
    }

    async fn archive_and_remove(
        &self,
        caller: UserId,
        id: ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<Tombstone, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let Some(row) = lock_row(conn, id).await? else {
                    return Ok(Err(ArticleRepositoryError::missing(id.0)));
                };
                if let Err(denied) = ensure_author(&row, caller) {
                    return Ok(Err(denied));
                }

                let tombstone = Tombstone::capture(&row_to_article(row), deleted_at);
                diesel::insert_into(deleted_articles::table)
                    .values(&tombstone_row(&tombstone))
                    .execute(conn)
                    .await?;
                diesel::delete(articles::table.find(id.0))
                    .execute(conn)
                    .await?;
                Ok(Ok(tombstone))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?
    }
}
