//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use blog_backend::Trace;
#[cfg(debug_assertions)]
use blog_backend::doc::ApiDoc;
use blog_backend::domain::TokenService;
use blog_backend::inbound::http::auth_gate::AuthGate;
use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::routes;
use blog_backend::inbound::http::state::HttpState;

use state_builders::build_http_state;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    tokens: Arc<TokenService>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        tokens,
    } = deps;

    // Trace is registered last so it wraps the gate and rejections carry a
    // trace id.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(AuthGate::new(tokens))
        .wrap(Trace)
        .configure(routes::configure);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct the HTTP server.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        tokens: config.tokens.clone(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
