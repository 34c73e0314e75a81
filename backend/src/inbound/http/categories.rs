//! Category endpoints.
//!
//! ```text
//! POST   /category/      {"name":"News","slug":"news","description":null}
//! GET    /category/
//! GET    /category/{id}
//! DELETE /category/{id}
//! ```
//!
//! Listing is public. Creation and deletion re-resolve the caller through
//! [`CurrentIdentity`], so a deactivated account cannot mutate categories.

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Category, CategoryDraft, CategoryId, Error};

use super::ApiResult;
use super::auth::MessageResponse;
use super::identity::CurrentIdentity;
use super::state::HttpState;

/// Request body for `POST /category/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "News")]
    pub name: String,
    #[schema(example = "news")]
    pub slug: String,
    pub description: Option<String>,
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/category/",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 409, description = "Slug or name already taken", body = Error)
    ),
    tags = ["category"],
    operation_id = "createCategory"
)]
#[post("/category/")]
pub async fn create_category(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    payload: web::Json<CreateCategoryRequest>,
) -> ApiResult<web::Json<Category>> {
    let CreateCategoryRequest {
        name,
        slug,
        description,
    } = payload.into_inner();
    let draft = CategoryDraft::new(name, slug, description)?;
    let category = state.categories.create(&draft).await?;
    debug!(category_id = %category.id, created_by = %caller.id, "category created");
    Ok(web::Json(category))
}

/// List every category.
#[utoipa::path(
    get,
    path = "/category/",
    responses((status = 200, description = "All categories", body = [Category])),
    tags = ["category"],
    operation_id = "listCategories",
    security([])
)]
#[get("/category/")]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Category>>> {
    let categories = state.categories_query.list().await?;
    Ok(web::Json(categories))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/category/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["category"],
    operation_id = "getCategory"
)]
#[get("/category/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Category>> {
    let category = state
        .categories_query
        .get(CategoryId(path.into_inner()))
        .await?;
    Ok(web::Json(category))
}

/// Delete a category. Articles referencing it are left in place.
#[utoipa::path(
    delete,
    path = "/category/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["category"],
    operation_id = "deleteCategory"
)]
#[delete("/category/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = CategoryId(path.into_inner());
    state.categories.delete(id).await?;
    debug!(category_id = %id, deleted_by = %caller.id, "category deleted");
    Ok(web::Json(MessageResponse::new("Category deleted successfully")))
}
