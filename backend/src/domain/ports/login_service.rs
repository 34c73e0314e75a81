//! Driving port for login.
//!
//! Inbound adapters call this to exchange credentials for a bearer token
//! without knowing how identities are stored or tokens are signed.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials};

/// Exchange credentials for an access token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate and mint a token. Any mismatch is `Unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;
}
