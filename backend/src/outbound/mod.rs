//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **queue**: the `email_jobs` table as producer and consumer store
//! - **mail**: SMTP delivery through lettre
//! - **memory**: in-process store used without a database and in tests
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod queue;
