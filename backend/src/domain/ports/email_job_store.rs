//! Consumer side of the email queue: claiming and settling jobs.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{EmailJob, JobId, QueueName, define_port_error};

define_port_error! {
    /// Errors raised while claiming or settling jobs.
    pub enum EmailJobStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "email job store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "email job store query failed: {message}",
        /// A stored payload could not be decoded.
        Payload { message: String } => "email job payload is unreadable: {message}",
    }
}

/// A job claimed by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedJob {
    pub id: JobId,
    pub queue: QueueName,
    pub job: EmailJob,
    /// Failed deliveries recorded before this claim.
    pub attempts: u32,
}

/// Job storage used by the email worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailJobStore: Send + Sync {
    /// Claim the oldest due job on any of `queues`, hiding it from other
    /// workers until settled.
    async fn claim_next(
        &self,
        queues: &[QueueName],
        now: DateTime<Utc>,
    ) -> Result<Option<ClaimedJob>, EmailJobStoreError>;

    /// Mark a job delivered.
    async fn complete(&self, id: JobId) -> Result<(), EmailJobStoreError>;

    /// Record a failure and make the job due again at `run_at`.
    async fn reschedule(
        &self,
        id: JobId,
        attempts: u32,
        run_at: DateTime<Utc>,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError>;

    /// Record a terminal failure.
    async fn fail(
        &self,
        id: JobId,
        attempts: u32,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError>;
}
