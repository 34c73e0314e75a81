//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use blog_backend::domain::TokenService;
use blog_backend::inbound::http::auth_config::CookiePolicy;
use blog_backend::outbound::persistence::DbPool;

/// Everything the server factory needs besides the health flags.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<TokenService>,
    pub(crate) cookies: CookiePolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<TokenService>, cookies: CookiePolicy) -> Self {
        Self {
            bind_addr,
            tokens,
            cookies,
            db_pool: None,
        }
    }

    /// Use PostgreSQL adapters instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
