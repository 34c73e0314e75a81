//! One-way credential hashing.
//!
//! New credentials are hashed with Argon2id in PHC string form. Verification
//! accepts any digest this process can recognise: Argon2 and PBKDF2 PHC
//! strings, and bcrypt `$2*$` digests carried over from older deployments.
//!
//! Async callers use [`CredentialHasher::spawn_hash`] and
//! [`CredentialHasher::spawn_verify`], which run the work on Tokio's blocking
//! pool so request workers are not stalled.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, Params};
use pbkdf2::Pbkdf2;
use tracing::debug;

/// Failure to produce a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct HashError {
    message: String,
}

/// Salted, algorithm-tagged credential hasher.
///
/// # Examples
/// ```
/// use blog_backend::domain::CredentialHasher;
///
/// let hasher = CredentialHasher::default();
/// let digest = hasher.hash("pw1").expect("hash");
/// assert!(hasher.verify("pw1", &digest));
/// assert!(!hasher.verify("pw2", &digest));
/// ```
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    /// Hasher with explicit Argon2 cost parameters.
    ///
    /// Tests use this with minimal costs; production uses [`Default`].
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Errors
    /// Returns [`HashError`] if Argon2 rejects the input.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|error| HashError {
                message: error.to_string(),
            })
    }

    /// Whether `plaintext` matches `digest`. Malformed digests never match.
    #[must_use]
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        if digest.starts_with("$2") {
            return bcrypt::verify(plaintext, digest).unwrap_or_else(|error| {
                debug!(%error, "unreadable bcrypt digest");
                false
            });
        }
        match PasswordHash::new(digest) {
            Ok(parsed) => parsed
                .verify_password(&[&self.argon2, &Pbkdf2], plaintext)
                .is_ok(),
            Err(error) => {
                debug!(%error, "unreadable PHC digest");
                false
            }
        }
    }
}

impl CredentialHasher {
    /// [`hash`](Self::hash) on the blocking thread pool.
    ///
    /// # Errors
    /// Returns [`HashError`] if Argon2 rejects the input or the task panics.
    pub async fn spawn_hash(&self, plaintext: &str) -> Result<String, HashError> {
        let hasher = self.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|error| HashError {
                message: format!("hashing task failed: {error}"),
            })?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    ///
    /// # Errors
    /// Returns [`HashError`] only if the task panics or is cancelled.
    pub async fn spawn_verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        let hasher = self.clone();
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|error| HashError {
                message: format!("verification task failed: {error}"),
            })
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}
