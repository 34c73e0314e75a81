//! Blog backend library.
//!
//! Layers follow a ports-and-adapters split: [`domain`] holds types,
//! services and ports; [`outbound`] implements the driven ports over
//! PostgreSQL, the job table and SMTP; [`inbound`] exposes the HTTP API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
