//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and behaviour suites (in `tests/`), which
//! reach it through the `test-support` feature.

use std::sync::Mutex;

use argon2::Params;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::CredentialHasher;

/// Clock whose reading only moves when a test says so.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock pinned to a fixed, readable instant.
    pub fn fixed() -> Self {
        let now = match Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).single() {
            Some(now) => now,
            None => panic!("fixed clock instant"),
        };
        Self::new(now)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Argon2 hasher with minimal costs so suites stay fast.
pub fn cheap_hasher() -> CredentialHasher {
    match Params::new(8, 1, 1, None) {
        Ok(params) => CredentialHasher::with_params(params),
        Err(error) => panic!("argon2 params: {error}"),
    }
}

/// Secret long enough for release-mode token configuration.
pub const TEST_TOKEN_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";
