//! Token secret and cookie policy parsing.
//!
//! Values come from the process environment through [`mockable::Env`] so the
//! rules can be tested without touching real variables. Debug builds warn and
//! fall back to defaults; release builds require every toggle explicitly and
//! a secret of at least [`TOKEN_SECRET_MIN_LEN`] bytes.

use std::path::PathBuf;

use actix_web::cookie::SameSite;
use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::TOKEN_SECRET_MIN_LEN;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/auth_secret";
const EPHEMERAL_SECRET_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "AUTH_COOKIE_SECURE";
const SAMESITE_ENV: &str = "AUTH_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "AUTH_ALLOW_EPHEMERAL";
const SECRET_FILE_ENV: &str = "AUTH_SECRET_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates defaults and warns about missing toggles.
    Debug,
    /// Requires explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use blog_backend::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Cookie attributes applied to the auth cookies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Whether cookies are marked `Secure`.
    pub secure: bool,
    /// `SameSite` attribute for the `access_token` cookie.
    pub same_site: SameSite,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Lax,
        }
    }
}

/// Settings derived from the environment.
pub struct AuthSettings {
    /// Raw signing secret; cleared on drop.
    pub secret: Zeroizing<Vec<u8>>,
    pub cookies: CookiePolicy,
}

/// Errors raised while validating auth configuration.
#[derive(thiserror::Error, Debug)]
pub enum AuthConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("AUTH_SAMESITE=None requires AUTH_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("AUTH_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build auth settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use blog_backend::inbound::http::auth_config::{auth_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("auth_secret_example");
/// std::fs::write(&secret_path, vec![b'a'; 32])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(move |name| match name {
///         "AUTH_SECRET_FILE" => Some(secret_path.clone()),
///         "AUTH_COOKIE_SECURE" => Some("1".to_string()),
///         "AUTH_SAMESITE" => Some("Strict".to_string()),
///         "AUTH_ALLOW_EPHEMERAL" => Some("0".to_string()),
///         _ => None,
///     });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookies.secure);
/// assert_eq!(settings.secret.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let secure = cookie_secure_from_env(env, mode)?;
    let same_site = same_site_from_env(env, mode, secure)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let secret = secret_from_env(env, mode, allow_ephemeral)?;

    Ok(AuthSettings {
        secret,
        cookies: CookiePolicy { secure, same_site },
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        if mode.is_debug() {
            warn!("AUTH_COOKIE_SECURE not set; defaulting to secure");
            return Ok(true);
        }
        return Err(AuthConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid AUTH_COOKIE_SECURE; defaulting to secure");
            Ok(true)
        }
        None => Err(AuthConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, AuthConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            warn!("AUTH_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        return Err(AuthConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                if !mode.is_debug() {
                    return Err(AuthConfigError::InsecureSameSiteNone);
                }
                warn!("AUTH_SAMESITE=None with AUTH_COOKIE_SECURE=0; browsers may reject the cookie");
            }
            Ok(SameSite::None)
        }
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid AUTH_SAMESITE, using default");
            Ok(default_same_site)
        }
        _ => Err(AuthConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        if mode.is_debug() {
            return Ok(false);
        }
        return Err(AuthConfigError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV,
        });
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(AuthConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid AUTH_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        None => Err(AuthConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, AuthConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length < TOKEN_SECRET_MIN_LEN {
                return Err(AuthConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            Ok(bytes)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using ephemeral token secret (dev only); tokens die with the process"
            );
            let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
            rand::thread_rng().fill_bytes(secret.as_mut_slice());
            Ok(secret)
        }
        Err(error) => Err(AuthConfigError::SecretRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
