//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module tree.
//! - **Strongly typed errors**: pool and Diesel failures are mapped to the
//!   port error of each repository; unique violations become `Duplicate*`.
//!
//! # Example
//!
//! ```ignore
//! use blog_backend::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let articles = DieselArticleRepository::new(pool);
//! ```

pub(crate) mod diesel_basic_error_mapping;
mod diesel_article_repository;
mod diesel_category_repository;
mod diesel_identity_repository;
mod migrations;
pub(crate) mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_identity_repository::DieselIdentityRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
