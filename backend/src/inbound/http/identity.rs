//! Authoritative per-request identity.
//!
//! [`CurrentIdentity`] re-runs token verification through the
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) port and
//! reloads the identity, so a deactivated account is rejected even while its
//! token is still valid. Mutating handlers depend on this, not on the gate.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Identity};

use super::auth_gate::{NOT_AUTHENTICATED, bearer_token};
use super::state::HttpState;

/// Identity resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl std::ops::Deref for CurrentIdentity {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentIdentity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = token.ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;
            let identity = state.identities.resolve(&token).await?;
            Ok(Self(identity))
        })
    }
}
