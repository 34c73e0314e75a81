//! SMTP delivery through `lettre`.
//!
//! The transport is unauthenticated and unencrypted, matching a local relay
//! such as MailHog on port 1025. Put TLS termination in the relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::domain::ports::{Mailer, MailerError, OutgoingEmail};

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub from: String,
}

/// [`Mailer`] backed by an async SMTP transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer for the relay in `settings`.
    ///
    /// # Errors
    /// Returns [`MailerError::Message`] when the sender address is invalid.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailerError> {
        let from = parse_mailbox(&settings.from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .build();
        Ok(Self { transport, from })
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailerError> {
    raw.parse::<Mailbox>()
        .map_err(|error| MailerError::message(format!("invalid address {raw}: {error}")))
}

/// Assemble a MIME message: `multipart/alternative` when an HTML body is
/// present, plain text otherwise.
pub(crate) fn build_message(from: Mailbox, email: &OutgoingEmail) -> Result<Message, MailerError> {
    let builder = Message::builder()
        .from(from)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str());
    let built = match &email.html_body {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone()),
    };
    built.map_err(|error| MailerError::message(error.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let message = build_message(self.from.clone(), email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|error| MailerError::transport(error.to_string()))?;
        debug!(to = %email.to, code = %response.code(), "smtp relay accepted message");
        Ok(())
    }
}
