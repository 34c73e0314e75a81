//! Driving port for full per-request identity resolution.

use async_trait::async_trait;

use crate::domain::{Error, Identity};

/// Turn a bearer token into a live identity snapshot.
///
/// Unlike the request gate, which only checks the token, this reloads the
/// identity so deactivation takes effect before the token expires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Verify `token`, reload the identity by email and reject missing or
    /// inactive identities with `Unauthorized`.
    async fn resolve(&self, token: &str) -> Result<Identity, Error>;
}
