//! Coarse request gate for bearer tokens.
//!
//! Every request outside the public path set must carry a token that
//! verifies. The gate checks the signature and expiry only; it never touches
//! the credential store. Verified claims are stored in request extensions and
//! handlers read them with `web::ReqData<AuthClaims>`.
//!
//! Handlers that act on behalf of a user additionally extract
//! [`CurrentIdentity`](super::identity::CurrentIdentity), which reloads the
//! identity and rejects deactivated accounts.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{HttpMessage as _, HttpRequest, ResponseError as _};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error, TokenService};

use super::cookies::ACCESS_TOKEN_COOKIE;

/// Paths that bypass the gate. Matched exactly.
pub const PUBLIC_PATHS: [&str; 7] = [
    "/auth/login",
    "/auth/login-form",
    "/user/",
    "/category/",
    "/article/",
    "/health/ready",
    "/health/live",
];

/// Prefix under which API documentation is served without a token.
pub const DOCS_PREFIX: &str = "/docs";

/// Message returned when no token was presented.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Whether `path` bypasses the gate.
///
/// # Examples
/// ```
/// use blog_backend::inbound::http::auth_gate::is_public_path;
///
/// assert!(is_public_path("/article/"));
/// assert!(!is_public_path("/article/7"));
/// assert!(is_public_path("/docs/index.html"));
/// ```
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || path.starts_with(DOCS_PREFIX)
}

/// Token presented by the request.
///
/// A non-empty `access_token` cookie wins. The `Authorization: Bearer`
/// header is consulted only when there is no cookie token, never as a
/// fallback after a cookie token fails to verify.
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_owned());
    }
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

/// Middleware factory verifying bearer tokens on non-public paths.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use blog_backend::domain::TokenService;
/// use blog_backend::inbound::http::auth_gate::AuthGate;
///
/// fn app(tokens: Arc<TokenService>) {
///     let _app = App::new().wrap(AuthGate::new(tokens));
/// }
/// ```
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

/// Service wrapper produced by [`AuthGate`].
pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

fn admit(tokens: &TokenService, req: &ServiceRequest) -> Result<(), Error> {
    if is_public_path(req.path()) {
        return Ok(());
    }
    let token = bearer_token(req.request()).ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;
    let claims = tokens.verify(&token).map_err(|error| {
        debug!(%error, path = req.path(), "bearer token rejected");
        Error::from(error)
    })?;
    req.extensions_mut().insert(claims);
    Ok(())
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = Arc::clone(&self.tokens);
        Box::pin(async move {
            // Runs inside the caller's trace scope so rejections carry the id.
            match admit(&tokens, &req) {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(error) => {
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "auth_gate_tests.rs"]
mod tests;
