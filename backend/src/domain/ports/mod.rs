//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `EmailQueue`, `EmailJobStore`, `Mailer`) are
//! implemented by outbound adapters. Driving ports (`LoginService`,
//! `IdentityResolver`, `AccountCommand`, `Category*`, `Article*`) are what
//! inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod article_command;
mod article_repository;
mod category_command;
mod category_repository;
mod email_job_store;
mod email_queue;
mod identity_repository;
mod identity_resolver;
mod login_service;
mod mailer;

pub use account_command::{AccountCommand, TestEmailReceipt};
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use article_command::{ArticleCommand, ArticleQuery};
#[cfg(test)]
pub use article_command::{MockArticleCommand, MockArticleQuery};
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use category_command::{CategoryCommand, CategoryQuery};
#[cfg(test)]
pub use category_command::{MockCategoryCommand, MockCategoryQuery};
pub use category_repository::{CategoryRepository, CategoryRepositoryError};
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use email_job_store::{ClaimedJob, EmailJobStore, EmailJobStoreError};
#[cfg(test)]
pub use email_job_store::MockEmailJobStore;
pub use email_queue::{EmailJob, EmailQueue, EmailQueueError, JobId, QueueName};
#[cfg(test)]
pub use email_queue::MockEmailQueue;
pub use identity_repository::{IdentityRepository, IdentityRepositoryError};
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use mailer::{Mailer, MailerError, OutgoingEmail};
#[cfg(test)]
pub use mailer::MockMailer;
