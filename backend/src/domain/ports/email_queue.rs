//! Producer side of the transactional email queue.
//!
//! Delivery is at-least-once; retries happen on the consumer side and are
//! invisible to the producer. Producers must treat `enqueue` failures as
//! non-fatal.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the queue adapter.
    pub enum EmailQueueError {
        /// Queue infrastructure is unavailable.
        Unavailable { message: String } => "email queue is unavailable: {message}",
        /// The job could not be persisted.
        Rejected { message: String } => "email job was rejected: {message}",
    }
}

/// Named queues consumed by workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueName {
    /// Transactional user-facing email.
    Emails,
    /// Everything else, including diagnostics.
    Default,
}

impl QueueName {
    /// Every queue a worker should poll.
    pub const ALL: [Self; 2] = [Self::Emails, Self::Default];

    /// Stable storage name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emails => "emails",
            Self::Default => "default",
        }
    }

    /// Parse a stored queue name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|queue| queue.as_str() == raw)
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email work item payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmailJob {
    /// Greeting sent after registration.
    Welcome { email: String, name: String },
    /// Diagnostic message proving the pipeline works.
    Test { email: String },
}

impl EmailJob {
    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::Welcome { email, .. } | Self::Test { email } => email,
        }
    }
}

/// Handle identifying an enqueued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enqueue email work for background delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailQueue: Send + Sync {
    /// Persist `job` on `queue` and return its handle.
    async fn enqueue(&self, queue: QueueName, job: &EmailJob) -> Result<JobId, EmailQueueError>;
}
