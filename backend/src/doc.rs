//! OpenAPI document for the HTTP API.
//!
//! [`ApiDoc`] registers every handler under `crate::inbound::http`, the
//! domain schemas they return and two equivalent security schemes: a bearer
//! token in the `Authorization` header and the same token in the
//! `access_token` cookie. The cookie wins when both are sent.
//!
//! Debug builds serve the document at `/docs/openapi.json` with Swagger UI
//! under `/docs/`; `cargo run --bin openapi-dump` prints it for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::TestEmailReceipt;
use crate::domain::{Article, Category, Error, ErrorCode, Identity};
use crate::inbound::http::articles::{
    ArticleListResponse, CreateArticleRequest, UpdateArticleRequest,
};
use crate::inbound::http::auth::{LoginForm, LoginRequest, MessageResponse, TokenResponse};
use crate::inbound::http::categories::CreateCategoryRequest;
use crate::inbound::http::cookies::ACCESS_TOKEN_COOKIE;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::users::RegisterRequest;

/// Name of the `Authorization: Bearer` scheme.
pub const BEARER_SCHEME: &str = "BearerAuth";
/// Name of the cookie scheme.
pub const COOKIE_SCHEME: &str = "AccessTokenCookie";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /auth/login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            COOKIE_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                ACCESS_TOKEN_COOKIE,
                "Same token, set by the login routes. Checked before the header.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace blog API",
        description = "Users, categories and articles with token authentication.",
        license(name = "MIT")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("BearerAuth" = []), ("AccessTokenCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::login_form,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::send_test_email,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Identity,
        Category,
        Article,
        TestEmailReceipt,
        LoginForm,
        LoginRequest,
        TokenResponse,
        MessageResponse,
        RegisterRequest,
        CreateCategoryRequest,
        CreateArticleRequest,
        UpdateArticleRequest,
        ArticleListResponse,
        ProbeStatus,
    )),
    tags(
        (name = "auth", description = "Login and logout"),
        (name = "user", description = "Registration and email diagnostics"),
        (name = "category", description = "Article categories"),
        (name = "article", description = "Articles and their archive"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
