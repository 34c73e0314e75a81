//! Category use-cases.
//!
//! Deleting a category never looks at articles. References from existing
//! articles are left dangling.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CategoryCommand, CategoryQuery, CategoryRepository, CategoryRepositoryError,
};
use crate::domain::{Category, CategoryDraft, CategoryId, Error};

pub(crate) const CATEGORY_NOT_FOUND: &str = "Category not found";

/// Category service implementing [`CategoryCommand`] and [`CategoryQuery`].
#[derive(Clone)]
pub struct CategoryService<R> {
    categories: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CategoryService<R> {
    /// Create a service over the category store.
    pub fn new(categories: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { categories, clock }
    }
}

pub(crate) fn map_category_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("category repository unavailable: {message}"))
        }
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category repository error: {message}"))
        }
        CategoryRepositoryError::DuplicateSlug { .. } => {
            Error::conflict("Category with this slug already exists")
        }
        CategoryRepositoryError::DuplicateName { .. } => {
            Error::conflict("Category with this name already exists")
        }
    }
}

#[async_trait]
impl<R> CategoryCommand for CategoryService<R>
where
    R: CategoryRepository,
{
    async fn create(&self, draft: &CategoryDraft) -> Result<Category, Error> {
        let category = self
            .categories
            .insert(draft, self.clock.utc())
            .await
            .map_err(map_category_error)?;
        info!(category_id = %category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), Error> {
        let removed = self
            .categories
            .delete(id)
            .await
            .map_err(map_category_error)?;
        if removed {
            info!(category_id = %id, "category deleted");
            Ok(())
        } else {
            Err(Error::not_found(CATEGORY_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<R> CategoryQuery for CategoryService<R>
where
    R: CategoryRepository,
{
    async fn list(&self) -> Result<Vec<Category>, Error> {
        self.categories.list().await.map_err(map_category_error)
    }

    async fn get(&self, id: CategoryId) -> Result<Category, Error> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(map_category_error)?
            .ok_or_else(|| Error::not_found(CATEGORY_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCategoryRepository;
    use crate::test_support::MutableClock;
    use rstest::rstest;

    fn service(repo: MockCategoryRepository) -> CategoryService<MockCategoryRepository> {
        CategoryService::new(Arc::new(repo), Arc::new(MutableClock::fixed()))
    }

    fn news() -> CategoryDraft {
        CategoryDraft::new("News", "news", None).expect("draft")
    }

    #[tokio::test]
    async fn create_stamps_clock_time() {
        let clock = MutableClock::fixed();
        let now = clock.utc();
        let mut repo = MockCategoryRepository::new();
        repo.expect_insert()
            .withf(move |_, created_at| *created_at == now)
            .times(1)
            .return_once(move |draft, created_at| {
                Ok(Category {
                    id: CategoryId(1),
                    name: draft.name.clone(),
                    slug: draft.slug.clone(),
                    description: None,
                    created_at,
                })
            });

        let category = service(repo).create(&news()).await.expect("created");
        assert_eq!(category.created_at, now);
        assert_eq!(category.slug, "news");
    }

    #[rstest]
    #[case(
        CategoryRepositoryError::duplicate_slug("news"),
        "Category with this slug already exists"
    )]
    #[case(
        CategoryRepositoryError::duplicate_name("News"),
        "Category with this name already exists"
    )]
    #[tokio::test]
    async fn duplicates_are_conflicts(
        #[case] error: CategoryRepositoryError,
        #[case] message: &str,
    ) {
        let mut repo = MockCategoryRepository::new();
        repo.expect_insert().return_once(move |_, _| Err(error));

        let err = service(repo).create(&news()).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn deleting_absent_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete().return_once(|_| Ok(false));

        let err = service(repo)
            .delete(CategoryId(9))
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), CATEGORY_NOT_FOUND);
    }

    #[tokio::test]
    async fn get_absent_category_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(repo).get(CategoryId(3)).await.expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
