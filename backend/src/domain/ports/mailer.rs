//! Outbound email delivery port.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailerError {
        /// The message could not be built (bad address, bad header).
        Message { message: String } => "email message is invalid: {message}",
        /// The transport refused or failed to deliver.
        Transport { message: String } => "email transport failed: {message}",
    }
}

/// Rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Sends rendered email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}
