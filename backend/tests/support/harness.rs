//! Shared world for HTTP behaviour suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs on an ephemeral port
//! against a [`MemoryStore`] so scenarios can inspect persisted state. The
//! `WorldFixture` stops the server even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use blog_backend::Trace;
use blog_backend::domain::{
    AccountService, ArticleService, AuthService, CategoryService, TRACE_ID_HEADER, TokenService,
};
use blog_backend::inbound::http::auth_config::CookiePolicy;
use blog_backend::inbound::http::auth_gate::AuthGate;
use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::routes;
use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
use blog_backend::outbound::memory::MemoryStore;
use blog_backend::test_support::{TEST_TOKEN_SECRET, cheap_hasher};
use mockable::DefaultClock;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) type SharedWorld = Rc<RefCell<BlogWorld>>;

/// Where a request carries its token.
#[derive(Debug, Clone)]
pub(crate) enum Credentials {
    None,
    Bearer(String),
    Cookie(String),
    Both { cookie: String, bearer: String },
}

/// Captured response of the last request.
#[derive(Debug, Default)]
pub(crate) struct LastResponse {
    pub(crate) status: Option<u16>,
    pub(crate) body: Option<Value>,
    pub(crate) trace_id: Option<String>,
}

pub(crate) struct BlogWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) store: Arc<MemoryStore>,
    /// Access tokens keyed by the scenario's user label.
    pub(crate) tokens: HashMap<String, String>,
    pub(crate) category_id: Option<i64>,
    pub(crate) article_id: Option<i64>,
    pub(crate) last: LastResponse,
}

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// Email address used for a scenario user label.
pub(crate) fn email_for(user: &str) -> String {
    format!("{user}@example.com")
}

/// Password used for every scenario user.
pub(crate) const PASSWORD: &str = "pw1";

fn build_state(store: &Arc<MemoryStore>, tokens: Arc<TokenService>) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let hasher = cheap_hasher();
    let auth = Arc::new(AuthService::new(store.clone(), hasher.clone(), tokens));
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        hasher,
        clock.clone(),
    ));
    let categories = Arc::new(CategoryService::new(store.clone(), clock.clone()));
    let articles = Arc::new(ArticleService::new(store.clone(), store.clone(), clock));
    HttpState::new(
        HttpStatePorts {
            login: auth.clone(),
            identities: auth,
            accounts,
            categories: categories.clone(),
            categories_query: categories,
            articles: articles.clone(),
            articles_query: articles,
        },
        CookiePolicy {
            secure: false,
            ..CookiePolicy::default()
        },
    )
}

async fn spawn_server(
    http_state: HttpState,
    tokens: Arc<TokenService>,
) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let http_data = web::Data::new(http_state);
    let health_data = web::Data::new(HealthState::new());
    health_data.mark_ready();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(health_data.clone())
            .wrap(AuthGate::new(tokens.clone()))
            .wrap(Trace)
            .configure(routes::configure)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let store = Arc::new(MemoryStore::new());
    let tokens = Arc::new(TokenService::new(
        TEST_TOKEN_SECRET.to_vec(),
        chrono::Duration::minutes(30),
        Arc::new(DefaultClock),
    ));
    let state = build_state(&store, tokens.clone());
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state, tokens))
        .expect("server should start");

    let world = Rc::new(RefCell::new(BlogWorld {
        runtime,
        local,
        base_url,
        server,
        store,
        tokens: HashMap::new(),
        category_id: None,
        article_id: None,
        last: LastResponse::default(),
    }));
    WorldFixture { world }
}

/// A request to send against the running server.
pub(crate) struct RequestSpec<'a> {
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) credentials: Credentials,
    pub(crate) json: Option<Value>,
    pub(crate) form: Option<Vec<(&'a str, String)>>,
}

impl<'a> RequestSpec<'a> {
    pub(crate) fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            credentials: Credentials::None,
            json: None,
            form: None,
        }
    }

    pub(crate) fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub(crate) fn form(mut self, fields: Vec<(&'a str, String)>) -> Self {
        self.form = Some(fields);
        self
    }
}

/// Send `request` and record status, body and trace id on the world.
pub(crate) fn send(world: &SharedWorld, request: RequestSpec<'_>) {
    let RequestSpec {
        method,
        path,
        credentials,
        json,
        form,
    } = request;
    let last = {
        let ctx = world.borrow();
        let url = format!("{}{path}", ctx.base_url);
        ctx.local.block_on(&ctx.runtime, async move {
            let mut request = Client::default().request(method, url);
            match credentials {
                Credentials::None => {}
                Credentials::Bearer(token) => {
                    request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
                }
                Credentials::Cookie(token) => {
                    request = request.insert_header((header::COOKIE, format!("access_token={token}")));
                }
                Credentials::Both { cookie, bearer } => {
                    request = request
                        .insert_header((header::COOKIE, format!("access_token={cookie}")))
                        .insert_header((header::AUTHORIZATION, format!("Bearer {bearer}")));
                }
            }
            let sent = match (json, form) {
                (Some(body), _) => request.send_json(&body).await,
                (None, Some(fields)) => request.send_form(&fields).await,
                (None, None) => request.send().await,
            };
            let mut response = sent.expect("request should reach the server");
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = response.body().await.expect("response body");
            let body = serde_json::from_slice(&bytes).ok();
            LastResponse {
                status: Some(status),
                body,
                trace_id,
            }
        })
    };
    world.borrow_mut().last = last;
}

/// Register `user` and store a token for them.
pub(crate) fn register_and_login(world: &SharedWorld, user: &str) {
    let email = email_for(user);
    send(
        world,
        RequestSpec::new(Method::POST, "/user/").json(serde_json::json!({
            "name": "Scenario",
            "surname": "User",
            "email": email,
            "password": PASSWORD,
        })),
    );
    assert_eq!(world.borrow().last.status, Some(200), "register {user}");

    send(
        world,
        RequestSpec::new(Method::POST, "/auth/login")
            .form(vec![("username", email), ("password", PASSWORD.to_owned())]),
    );
    let token = {
        let ctx = world.borrow();
        assert_eq!(ctx.last.status, Some(200), "login {user}");
        ctx.last
            .body
            .as_ref()
            .and_then(|body| body["access_token"].as_str())
            .expect("access token")
            .to_owned()
    };
    world.borrow_mut().tokens.insert(user.to_owned(), token);
}

/// Stored token for `user`.
pub(crate) fn token_for(world: &SharedWorld, user: &str) -> String {
    world
        .borrow()
        .tokens
        .get(user)
        .cloned()
        .unwrap_or_else(|| panic!("{user} has not logged in"))
}

pub(crate) fn last_status(world: &SharedWorld) -> u16 {
    world.borrow().last.status.expect("a request was sent")
}

pub(crate) fn last_message(world: &SharedWorld) -> String {
    world
        .borrow()
        .last
        .body
        .as_ref()
        .and_then(|body| body["message"].as_str().map(str::to_owned))
        .expect("error message in body")
}
