//! Login and per-request identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::account_service::map_identity_error;
use crate::domain::ports::{IdentityRepository, IdentityResolver, LoginService};
use crate::domain::{
    CredentialHasher, EmailAddress, Error, Identity, IssuedToken, LoginCredentials, TokenService,
};

const LOGIN_REJECTED: &str = "Incorrect email or password";

/// Authentication service implementing [`LoginService`] and
/// [`IdentityResolver`] over one credential store.
#[derive(Clone)]
pub struct AuthService<R> {
    identities: Arc<R>,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
}

impl<R> AuthService<R> {
    /// Create a service over the identity store and token service.
    pub fn new(identities: Arc<R>, hasher: CredentialHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            identities,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl<R> LoginService for AuthService<R>
where
    R: IdentityRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let Some(stored) = self
            .identities
            .find_by_email(credentials.email())
            .await
            .map_err(map_identity_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(LOGIN_REJECTED));
        };
        let matches = self
            .hasher
            .spawn_verify(credentials.password(), &stored.credential_hash)
            .await
            .map_err(|error| Error::internal(error.to_string()))?;
        if !matches {
            debug!(user_id = %stored.identity.id, "login with wrong password");
            return Err(Error::unauthorized(LOGIN_REJECTED));
        }
        if !stored.identity.is_active {
            debug!(user_id = %stored.identity.id, "login for inactive identity");
            return Err(Error::unauthorized(LOGIN_REJECTED));
        }
        self.tokens
            .issue(stored.identity.id, &stored.identity.email, None)
            .map_err(Error::from)
    }
}

#[async_trait]
impl<R> IdentityResolver for AuthService<R>
where
    R: IdentityRepository,
{
    async fn resolve(&self, token: &str) -> Result<Identity, Error> {
        let claims = self.tokens.verify(token)?;
        let email =
            EmailAddress::new(claims.sub).map_err(|_| Error::unauthorized("Invalid token"))?;
        let stored = self
            .identities
            .find_by_email(&email)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::unauthorized("User not found"))?;
        if stored.identity.id != claims.user_id {
            debug!(
                claimed = %claims.user_id,
                stored = %stored.identity.id,
                "token subject does not match stored identity"
            );
            return Err(Error::unauthorized("Invalid token"));
        }
        if !stored.identity.is_active {
            return Err(Error::unauthorized("User is inactive"));
        }
        Ok(stored.identity)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
