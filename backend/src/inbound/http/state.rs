//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ArticleCommand, ArticleQuery, CategoryCommand, CategoryQuery,
    IdentityResolver, LoginService,
};

use super::auth_config::CookiePolicy;

/// Parameter object bundling every port implementation used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub identities: Arc<dyn IdentityResolver>,
    pub accounts: Arc<dyn AccountCommand>,
    pub categories: Arc<dyn CategoryCommand>,
    pub categories_query: Arc<dyn CategoryQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub articles_query: Arc<dyn ArticleQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub identities: Arc<dyn IdentityResolver>,
    pub accounts: Arc<dyn AccountCommand>,
    pub categories: Arc<dyn CategoryCommand>,
    pub categories_query: Arc<dyn CategoryQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub articles_query: Arc<dyn ArticleQuery>,
    /// Attributes applied to the cookies set on login.
    pub cookies: CookiePolicy,
}

impl HttpState {
    /// Construct state from a ports bundle and the configured cookie policy.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use blog_backend::domain::{
    ///     ArticleService, AuthService, AccountService, CategoryService, CredentialHasher,
    ///     TokenService,
    /// };
    /// use blog_backend::inbound::http::auth_config::CookiePolicy;
    /// use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use blog_backend::outbound::memory::MemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = Arc::new(TokenService::new(
    ///     vec![7; 32],
    ///     chrono::Duration::minutes(30),
    ///     clock.clone(),
    /// ));
    /// let auth = Arc::new(AuthService::new(store.clone(), CredentialHasher::default(), tokens));
    /// let categories = Arc::new(CategoryService::new(store.clone(), clock.clone()));
    /// let articles = Arc::new(ArticleService::new(store.clone(), store.clone(), clock.clone()));
    /// let ports = HttpStatePorts {
    ///     login: auth.clone(),
    ///     identities: auth,
    ///     accounts: Arc::new(AccountService::new(
    ///         store.clone(),
    ///         store,
    ///         CredentialHasher::default(),
    ///         clock,
    ///     )),
    ///     categories: categories.clone(),
    ///     categories_query: categories,
    ///     articles: articles.clone(),
    ///     articles_query: articles,
    /// };
    /// let state = HttpState::new(ports, CookiePolicy::default());
    /// assert!(state.cookies.secure);
    /// ```
    pub fn new(ports: HttpStatePorts, cookies: CookiePolicy) -> Self {
        let HttpStatePorts {
            login,
            identities,
            accounts,
            categories,
            categories_query,
            articles,
            articles_query,
        } = ports;
        Self {
            login,
            identities,
            accounts,
            categories,
            categories_query,
            articles,
            articles_query,
            cookies,
        }
    }
}
