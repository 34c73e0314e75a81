//! HTTP inbound adapter.
//!
//! Handlers translate requests into driving-port calls and map domain
//! [`Error`](crate::domain::Error)s to responses. Authentication happens in
//! two layers: [`auth_gate::AuthGate`] checks the token on every non-public
//! path, and [`identity::CurrentIdentity`] reloads the caller for handlers
//! that mutate state.

pub mod articles;
pub mod auth;
pub mod auth_config;
pub mod auth_gate;
pub mod categories;
pub mod cookies;
pub mod error;
pub mod health;
pub mod identity;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
