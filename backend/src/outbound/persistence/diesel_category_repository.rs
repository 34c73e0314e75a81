//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryDraft, CategoryId};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message,
};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel-backed implementation of the `CategoryRepository` port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    CategoryRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    draft: Option<&CategoryDraft>,
) -> CategoryRepositoryError {
    let failure = classify_diesel_error(error);
    if let Some(draft) = draft {
        if failure.violates("slug") {
            return CategoryRepositoryError::duplicate_slug(draft.slug.as_str());
        }
        if failure.violates("name") {
            return CategoryRepositoryError::duplicate_name(draft.name.as_str());
        }
    }
    match failure {
        DieselFailure::Connection(message) => CategoryRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            CategoryRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => CategoryRepositoryError::query(message),
    }
}

fn row_to_category(row: CategoryRow) -> Category {
    Category {
        id: CategoryId(row.id),
        name: row.name,
        slug: row.slug,
        description: row.description,
        created_at: row.created_at,
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert(
        &self,
        draft: &CategoryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCategoryRow {
            name: &draft.name,
            slug: &draft.slug,
            description: draft.description.as_deref(),
            created_at,
        };

        diesel::insert_into(categories::table)
            .values(&row)
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_category)
            .map_err(|error| map_diesel_error(error, Some(draft)))
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::id)
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(rows.into_iter().map(row_to_category).collect())
    }

    async fn find_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CategoryRow> = categories::table
            .find(id.0)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(row.map(row_to_category))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(categories::table.find(id.0))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(removed > 0)
    }
}
