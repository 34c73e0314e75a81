//! Request middleware.
//!
//! Authentication middleware lives with the HTTP adapter
//! ([`crate::inbound::http::auth_gate`]); this module holds concerns shared by
//! every route.

pub mod trace;

pub use trace::Trace;
