//! Port abstraction for the credential store.
use async_trait::async_trait;

use crate::domain::{EmailAddress, StoredIdentity};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "identity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail { email: String } => "identity with email {email} already exists",
    }
}

/// Credential store keyed by email.
///
/// Email uniqueness is enforced by the store itself so two concurrent inserts
/// for the same address resolve to one success and one `DuplicateEmail`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Insert a new identity.
    async fn insert(&self, identity: &StoredIdentity) -> Result<(), IdentityRepositoryError>;

    /// Fetch an identity by its exact email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredIdentity>, IdentityRepositoryError>;
}
