//! Signed, time-bounded bearer tokens.
//!
//! Tokens are HS256 JWTs signed with one process-wide secret. The service is
//! built once at startup and shared behind an `Arc`; it holds no mutable
//! state. Expiry is evaluated against an injected [`Clock`] rather than the
//! JWT library's wall clock so boundary behaviour is testable.
//!
//! Tokens carry no revocation identifier: logout only removes client cookies
//! and a token stays valid until it expires.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::{EmailAddress, Error, UserId};

/// Default token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Minimum signing secret length accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject label: the identity's email address.
    pub sub: String,
    /// Subject identifier.
    pub user_id: UserId,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Reasons a token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed")]
    Signing,
    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Expired => Self::unauthorized("Token has expired"),
            TokenError::Malformed | TokenError::InvalidSignature => {
                Self::unauthorized("Invalid token")
            }
            TokenError::Signing => Self::internal("token signing failed"),
            TokenError::LifetimeOutOfRange => Self::internal("token lifetime is out of range"),
        }
    }
}

/// A freshly minted token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: AuthClaims,
    pub ttl: Duration,
}

/// Issues and verifies access tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Build a service from raw secret bytes. The input buffer is zeroised.
    #[must_use]
    pub fn new(mut secret: Vec<u8>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let encoding = EncodingKey::from_secret(&secret);
        let decoding = DecodingKey::from_secret(&secret);
        secret.zeroize();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding,
            decoding,
            validation,
            ttl,
            clock,
        }
    }

    /// Mint a token for the identity, expiring after `ttl` or the default.
    ///
    /// # Errors
    /// Returns [`TokenError::LifetimeOutOfRange`] when `now + ttl` does not
    /// fit a timestamp, and [`TokenError::Signing`] if encoding fails.
    pub fn issue(
        &self,
        user_id: UserId,
        email: &EmailAddress,
        ttl: Option<Duration>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = ttl.unwrap_or(self.ttl);
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;
        let claims = AuthClaims {
            sub: email.as_ref().to_owned(),
            user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)?;
        Ok(IssuedToken { token, claims, ttl })
    }

    /// Check signature then expiry and return the claims.
    ///
    /// # Errors
    /// Returns [`TokenError::InvalidSignature`] when the signature does not
    /// verify, [`TokenError::Malformed`] for structural failures, and
    /// [`TokenError::Expired`] once the clock passes `exp`.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let data = decode::<AuthClaims>(token, &self.decoding, &self.validation).map_err(
            |error| match error.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            },
        )?;
        if self.clock.utc().timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
