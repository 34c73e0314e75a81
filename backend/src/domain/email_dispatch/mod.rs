//! Background delivery of queued email jobs.
//!
//! The dispatcher claims one due job at a time, renders and sends it, then
//! settles the job: completed on success, rescheduled or failed according to
//! [`RetryPolicy`] otherwise. Delivery is at-least-once; a worker crash
//! between sending and settling resends after the claim lapses.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::ports::{
    ClaimedJob, EmailJob, EmailJobStore, EmailJobStoreError, JobId, Mailer, QueueName,
};

mod policy;
mod templates;

pub use policy::{RetryDecision, RetryPolicy};
pub use templates::{WELCOME_SUBJECT, welcome_email};

/// Result of one polling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No job was due.
    Idle,
    /// The job was handled and marked done.
    Delivered(JobId),
    /// Delivery failed and the job will run again.
    Rescheduled(JobId),
    /// Delivery failed for the last time.
    Failed(JobId),
}

/// Email job consumer.
pub struct EmailDispatcher {
    store: Arc<dyn EmailJobStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
}

fn map_store_error(error: EmailJobStoreError) -> Error {
    match error {
        EmailJobStoreError::Connection { message } => {
            Error::service_unavailable(format!("email job store unavailable: {message}"))
        }
        EmailJobStoreError::Query { message } | EmailJobStoreError::Payload { message } => {
            Error::internal(format!("email job store error: {message}"))
        }
    }
}

impl EmailDispatcher {
    pub fn new(
        store: Arc<dyn EmailJobStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            mailer,
            clock,
            policy,
        }
    }

    /// Claim and process at most one job from any queue.
    ///
    /// # Errors
    /// Returns an error only when the job store itself fails; delivery
    /// failures are recorded on the job.
    pub async fn poll_once(&self) -> Result<DispatchOutcome, Error> {
        let Some(claimed) = self
            .store
            .claim_next(&QueueName::ALL, self.clock.utc())
            .await
            .map_err(map_store_error)?
        else {
            return Ok(DispatchOutcome::Idle);
        };

        match self.deliver(&claimed).await {
            Ok(()) => {
                self.store
                    .complete(claimed.id)
                    .await
                    .map_err(map_store_error)?;
                info!(job_id = %claimed.id, queue = %claimed.queue, "email job done");
                Ok(DispatchOutcome::Delivered(claimed.id))
            }
            Err(reason) => self.settle_failure(&claimed, &reason).await,
        }
    }

    async fn deliver(&self, claimed: &ClaimedJob) -> Result<(), String> {
        match &claimed.job {
            EmailJob::Welcome { email, name } => {
                info!(job_id = %claimed.id, recipient = %email, "sending welcome email");
                self.mailer
                    .send(&welcome_email(email, name))
                    .await
                    .map_err(|error| error.to_string())
            }
            EmailJob::Test { email } => {
                info!(job_id = %claimed.id, recipient = %email, "test email job executed");
                Ok(())
            }
        }
    }

    async fn settle_failure(
        &self,
        claimed: &ClaimedJob,
        reason: &str,
    ) -> Result<DispatchOutcome, Error> {
        match self.policy.after_failure(claimed.attempts, self.clock.utc()) {
            RetryDecision::Reschedule { attempts, run_at } => {
                warn!(
                    job_id = %claimed.id,
                    queue = %claimed.queue,
                    attempts,
                    %run_at,
                    error = reason,
                    "email delivery failed; retrying"
                );
                self.store
                    .reschedule(claimed.id, attempts, run_at, reason)
                    .await
                    .map_err(map_store_error)?;
                Ok(DispatchOutcome::Rescheduled(claimed.id))
            }
            RetryDecision::GiveUp { attempts } => {
                error!(
                    job_id = %claimed.id,
                    queue = %claimed.queue,
                    attempts,
                    error = reason,
                    "email delivery failed permanently"
                );
                self.store
                    .fail(claimed.id, attempts, reason)
                    .await
                    .map_err(map_store_error)?;
                Ok(DispatchOutcome::Failed(claimed.id))
            }
        }
    }
}

#[cfg(test)]
mod tests;
