//! Article endpoints.
//!
//! ```text
//! POST   /article/                 {"title":"...","content":"...","category_id":1}
//! GET    /article/?page=1&page_size=10&category_id=1&is_published=true
//! GET    /article/{id}
//! PUT    /article/{id}             {"title":"..."}
//! DELETE /article/{id}
//! ```
//!
//! Mutations run as the identity resolved from the request token; the
//! service layer enforces authorship and writes a tombstone on delete.

use actix_web::{delete, get, post, put, web};
use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, CategoryId, Error,
};

use super::ApiResult;
use super::auth::MessageResponse;
use super::identity::CurrentIdentity;
use super::state::HttpState;

/// Request body for `POST /article/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: i32,
    pub image_url: Option<String>,
    #[serde(default = "published_by_default")]
    #[schema(default = true)]
    pub is_published: bool,
}

const fn published_by_default() -> bool {
    true
}

impl From<CreateArticleRequest> for ArticleDraft {
    fn from(value: CreateArticleRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            category_id: CategoryId(value.category_id),
            image_url: value.image_url,
            is_published: value.is_published,
        }
    }
}

/// Request body for `PUT /article/{id}`; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<i32>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

impl From<UpdateArticleRequest> for ArticlePatch {
    fn from(value: UpdateArticleRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            category_id: value.category_id.map(CategoryId),
            image_url: value.image_url,
            is_published: value.is_published,
        }
    }
}

/// Query parameters for `GET /article/`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ArticleListQuery {
    /// One-based page number (default 1).
    pub page: Option<u32>,
    /// Items per page, 1 to 100 (default 10).
    pub page_size: Option<u32>,
    /// Only articles in this category.
    pub category_id: Option<i32>,
    /// Only published or only unpublished articles.
    pub is_published: Option<bool>,
}

/// One page of articles.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl From<Page<Article>> for ArticleListResponse {
    fn from(page: Page<Article>) -> Self {
        Self {
            articles: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

fn map_page_request_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::PageOutOfRange => "page",
        PageRequestError::PageSizeOutOfRange { .. } => "page_size",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create an article authored by the caller.
#[utoipa::path(
    post,
    path = "/article/",
    request_body = CreateArticleRequest,
    responses(
        (status = 200, description = "Article created", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["article"],
    operation_id = "createArticle"
)]
#[post("/article/")]
pub async fn create_article(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let draft = ArticleDraft::from(payload.into_inner()).validate()?;
    let article = state.articles.create(&caller, draft).await?;
    Ok(web::Json(article))
}

/// List articles newest first.
#[utoipa::path(
    get,
    path = "/article/",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Page of articles", body = ArticleListResponse),
        (status = 400, description = "Invalid page parameters", body = Error)
    ),
    tags = ["article"],
    operation_id = "listArticles",
    security([])
)]
#[get("/article/")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<web::Json<ArticleListResponse>> {
    let ArticleListQuery {
        page,
        page_size,
        category_id,
        is_published,
    } = query.into_inner();
    let request = PageRequest::from_optional(page, page_size).map_err(map_page_request_error)?;
    let filter = ArticleFilter {
        category_id: category_id.map(CategoryId),
        is_published,
    };
    let page = state.articles_query.list(filter, request).await?;
    Ok(web::Json(page.into()))
}

/// Fetch one article.
#[utoipa::path(
    get,
    path = "/article/{id}",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "Article not found", body = Error)
    ),
    tags = ["article"],
    operation_id = "getArticle"
)]
#[get("/article/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Article>> {
    let article = state.articles_query.get(ArticleId(path.into_inner())).await?;
    Ok(web::Json(article))
}

/// Update an article the caller authored.
#[utoipa::path(
    put,
    path = "/article/{id}",
    params(("id" = i32, Path, description = "Article id")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = Article),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Article or category not found", body = Error)
    ),
    tags = ["article"],
    operation_id = "updateArticle"
)]
#[put("/article/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    path: web::Path<i32>,
    payload: web::Json<UpdateArticleRequest>,
) -> ApiResult<web::Json<Article>> {
    let id = ArticleId(path.into_inner());
    let patch = ArticlePatch::from(payload.into_inner()).validate()?;
    let article = state.articles.update(&caller, id, patch).await?;
    Ok(web::Json(article))
}

/// Delete an article the caller authored, archiving it first.
#[utoipa::path(
    delete,
    path = "/article/{id}",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Article not found", body = Error)
    ),
    tags = ["article"],
    operation_id = "deleteArticle"
)]
#[delete("/article/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    path: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .articles
        .delete(&caller, ArticleId(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("Article deleted successfully")))
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;
