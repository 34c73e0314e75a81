//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, categories, deleted_articles, email_jobs, users};

// ---------------------------------------------------------------------------
// Identity models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub is_active: bool,
    pub hashed_password: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Category models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Article models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: i32,
    pub author_id: Uuid,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: Option<&'a str>,
    pub category_id: i32,
    pub author_id: Uuid,
    pub image_url: Option<&'a str>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `None` fields are left untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
pub(crate) struct ArticleChangeset<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub excerpt: Option<&'a str>,
    pub category_id: Option<i32>,
    pub image_url: Option<&'a str>,
    pub is_published: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deleted_articles)]
pub(crate) struct NewDeletedArticleRow {
    pub original_id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: i32,
    pub author_id: Uuid,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Email job models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = email_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmailJobRow {
    pub id: i64,
    pub queue: String,
    pub payload: serde_json::Value,
    pub attempts: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = email_jobs)]
pub(crate) struct NewEmailJobRow<'a> {
    pub queue: &'a str,
    pub payload: serde_json::Value,
    pub status: &'a str,
    pub attempts: i32,
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
