//! Driving port for account registration and email diagnostics.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, Identity, RegistrationDraft};

use super::{JobId, QueueName};

/// Handles returned by the test email endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TestEmailReceipt {
    #[schema(value_type = i64)]
    pub email_task_id: JobId,
    #[schema(value_type = i64)]
    pub test_task_id: JobId,
    #[schema(value_type = Vec<String>)]
    pub queues: Vec<QueueName>,
}

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an identity and schedule its welcome email.
    ///
    /// Succeeds even if the email cannot be scheduled.
    async fn register(&self, draft: &RegistrationDraft) -> Result<Identity, Error>;

    /// Enqueue one welcome and one test email to `email`.
    async fn send_test_emails(&self, email: &EmailAddress) -> Result<TestEmailReceipt, Error>;
}
