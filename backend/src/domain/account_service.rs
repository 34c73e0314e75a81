//! Account registration and email diagnostics.
//!
//! Registration is the only write that crosses into the email pipeline: once
//! the identity row exists, a welcome job is enqueued best-effort. A queue
//! outage never turns a successful registration into a failure.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, EmailJob, EmailQueue, EmailQueueError, IdentityRepository,
    IdentityRepositoryError, QueueName, TestEmailReceipt,
};
use crate::domain::{
    CredentialHasher, EmailAddress, Error, Identity, RegistrationDraft, StoredIdentity, UserId,
};

/// Registration service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<R, Q> {
    identities: Arc<R>,
    queue: Arc<Q>,
    hasher: CredentialHasher,
    clock: Arc<dyn Clock>,
}

impl<R, Q> AccountService<R, Q> {
    /// Create a service over the identity store and email queue.
    pub fn new(
        identities: Arc<R>,
        queue: Arc<Q>,
        hasher: CredentialHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            queue,
            hasher,
            clock,
        }
    }
}

pub(crate) fn map_identity_error(error: IdentityRepositoryError) -> Error {
    match error {
        IdentityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("identity repository unavailable: {message}"))
        }
        IdentityRepositoryError::Query { message } => {
            Error::internal(format!("identity repository error: {message}"))
        }
        IdentityRepositoryError::DuplicateEmail { .. } => {
            Error::conflict("User with this email already exists")
        }
    }
}

fn map_queue_error(error: EmailQueueError) -> Error {
    match error {
        EmailQueueError::Unavailable { message } => {
            Error::service_unavailable(format!("email queue unavailable: {message}"))
        }
        EmailQueueError::Rejected { message } => {
            Error::internal(format!("email job rejected: {message}"))
        }
    }
}

impl<R, Q> AccountService<R, Q>
where
    R: IdentityRepository,
    Q: EmailQueue,
{
    async fn enqueue_welcome(&self, identity: &Identity) {
        let job = EmailJob::Welcome {
            email: identity.email.to_string(),
            name: identity.name.to_string(),
        };
        match self.queue.enqueue(QueueName::Emails, &job).await {
            Ok(job_id) => info!(
                user_id = %identity.id,
                queue = %QueueName::Emails,
                %job_id,
                "welcome email enqueued"
            ),
            Err(error) => warn!(
                user_id = %identity.id,
                queue = %QueueName::Emails,
                %error,
                "failed to enqueue welcome email"
            ),
        }
    }
}

#[async_trait]
impl<R, Q> AccountCommand for AccountService<R, Q>
where
    R: IdentityRepository,
    Q: EmailQueue,
{
    async fn register(&self, draft: &RegistrationDraft) -> Result<Identity, Error> {
        let credential_hash = self
            .hasher
            .spawn_hash(draft.password())
            .await
            .map_err(|error| Error::internal(error.to_string()))?;
        let identity = Identity {
            id: UserId::random(),
            name: draft.name.clone(),
            surname: draft.surname.clone(),
            email: draft.email.clone(),
            is_active: true,
            created_at: self.clock.utc(),
        };
        let stored = StoredIdentity {
            identity,
            credential_hash,
        };
        self.identities
            .insert(&stored)
            .await
            .map_err(map_identity_error)?;

        self.enqueue_welcome(&stored.identity).await;
        Ok(stored.identity)
    }

    async fn send_test_emails(&self, email: &EmailAddress) -> Result<TestEmailReceipt, Error> {
        let welcome = EmailJob::Welcome {
            email: email.to_string(),
            name: "Test User".to_owned(),
        };
        let email_task_id = self
            .queue
            .enqueue(QueueName::Emails, &welcome)
            .await
            .map_err(map_queue_error)?;
        let test = EmailJob::Test {
            email: email.to_string(),
        };
        let test_task_id = self
            .queue
            .enqueue(QueueName::Default, &test)
            .await
            .map_err(map_queue_error)?;
        Ok(TestEmailReceipt {
            email_task_id,
            test_task_id,
            queues: vec![QueueName::Emails, QueueName::Default],
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
