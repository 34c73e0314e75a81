//! Domain types, services and the error taxonomy.
//!
//! Purpose: hold everything that is independent of HTTP and PostgreSQL.
//! Inbound adapters call the driving ports in [`ports`]; services here
//! implement them on top of the driven ports that outbound adapters provide.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Identity, Category, Article, Tombstone: stored entities.
//! - CredentialHasher, TokenService: authentication primitives.
//! - AccountService, AuthService, CategoryService, ArticleService,
//!   EmailDispatcher: use-case implementations.

pub mod account_service;
pub mod article;
pub mod article_service;
pub mod auth;
pub mod auth_service;
pub mod category;
pub mod category_service;
pub mod email_dispatch;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod token;
pub mod tombstone;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::article::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, ArticleValidationError,
    IMAGE_URL_MAX, TITLE_MAX,
};
pub use self::article_service::ArticleService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_service::AuthService;
pub use self::category::{
    CATEGORY_FIELD_MAX, Category, CategoryDraft, CategoryId, CategoryValidationError,
};
pub use self::category_service::CategoryService;
pub use self::email_dispatch::{
    DispatchOutcome, EmailDispatcher, RetryDecision, RetryPolicy, WELCOME_SUBJECT, welcome_email,
};
pub use self::error::{Error, ErrorCode};
pub use self::identity::{
    EmailAddress, Identity, IdentityValidationError, PersonName, RegistrationDraft,
    StoredIdentity, UserId,
};
pub use self::password::{CredentialHasher, HashError};
pub use self::token::{
    AuthClaims, DEFAULT_TOKEN_TTL_MINUTES, IssuedToken, TOKEN_SECRET_MIN_LEN, TokenError,
    TokenService,
};
pub use self::tombstone::Tombstone;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
