//! Builders wiring driving-port services onto repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use blog_backend::domain::ports::{
    ArticleRepository, CategoryRepository, EmailQueue, IdentityRepository,
};
use blog_backend::domain::{
    AccountService, ArticleService, AuthService, CategoryService, CredentialHasher, TokenService,
};
use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
use blog_backend::outbound::memory::MemoryStore;
use blog_backend::outbound::persistence::{
    DieselArticleRepository, DieselCategoryRepository, DieselIdentityRepository,
};
use blog_backend::outbound::queue::DieselEmailQueue;

use super::ServerConfig;

/// Driven adapters the services run on.
struct Repositories<I, C, A, Q> {
    identities: Arc<I>,
    categories: Arc<C>,
    articles: Arc<A>,
    queue: Arc<Q>,
}

fn build_ports<I, C, A, Q>(
    repos: Repositories<I, C, A, Q>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    I: IdentityRepository + 'static,
    C: CategoryRepository + 'static,
    A: ArticleRepository + 'static,
    Q: EmailQueue + 'static,
{
    let Repositories {
        identities,
        categories,
        articles,
        queue,
    } = repos;
    let hasher = CredentialHasher::default();
    let auth = Arc::new(AuthService::new(identities.clone(), hasher.clone(), tokens));
    let accounts = Arc::new(AccountService::new(identities, queue, hasher, clock.clone()));
    let category_service = Arc::new(CategoryService::new(categories.clone(), clock.clone()));
    let article_service = Arc::new(ArticleService::new(articles, categories, clock));
    HttpStatePorts {
        login: auth.clone(),
        identities: auth,
        accounts,
        categories: category_service.clone(),
        categories_query: category_service,
        articles: article_service.clone(),
        articles_query: article_service,
    }
}

/// Build handler state on PostgreSQL when a pool is configured, otherwise on
/// a process-local [`MemoryStore`].
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL adapters");
            build_ports(
                Repositories {
                    identities: Arc::new(DieselIdentityRepository::new(pool.clone())),
                    categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
                    articles: Arc::new(DieselArticleRepository::new(pool.clone())),
                    queue: Arc::new(DieselEmailQueue::new(pool.clone())),
                },
                config.tokens.clone(),
                clock,
            )
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on exit");
            let store = Arc::new(MemoryStore::new());
            build_ports(
                Repositories {
                    identities: store.clone(),
                    categories: store.clone(),
                    articles: store.clone(),
                    queue: store,
                },
                config.tokens.clone(),
                clock,
            )
        }
    };
    web::Data::new(HttpState::new(ports, config.cookies))
}
