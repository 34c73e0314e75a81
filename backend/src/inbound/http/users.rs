//! User registration and email diagnostics.
//!
//! ```text
//! POST /user/                         {"name":"Ada","surname":"Lovelace","email":"a@x.com","password":"pw1"}
//! POST /user/test-email?email=a@x.com
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::TestEmailReceipt;
use crate::domain::{EmailAddress, Error, Identity, RegistrationDraft};

use super::ApiResult;
use super::identity::CurrentIdentity;
use super::state::HttpState;

/// Registration body for `POST /user/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "Lovelace")]
    pub surname: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Query for `POST /user/test-email`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TestEmailQuery {
    /// Recipient of both test messages.
    pub email: String,
}

/// Register a new user.
///
/// The welcome email is queued best-effort; the user is returned even when
/// the queue is down.
#[utoipa::path(
    post,
    path = "/user/",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = Identity),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["user"],
    operation_id = "registerUser",
    security([])
)]
#[post("/user/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<Identity>> {
    let RegisterRequest {
        name,
        surname,
        email,
        password,
    } = payload.into_inner();
    let draft = RegistrationDraft::try_from_parts(&name, &surname, &email, &password)?;
    let identity = state.accounts.register(&draft).await?;
    info!(user_id = %identity.id, "user registered");
    Ok(web::Json(identity))
}

/// Queue a welcome and a test email to the given address.
#[utoipa::path(
    post,
    path = "/user/test-email",
    params(TestEmailQuery),
    responses(
        (status = 200, description = "Jobs queued", body = TestEmailReceipt),
        (status = 400, description = "Invalid email", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 503, description = "Email queue unavailable", body = Error)
    ),
    tags = ["user"],
    operation_id = "sendTestEmails"
)]
#[post("/user/test-email")]
pub async fn send_test_email(
    state: web::Data<HttpState>,
    caller: CurrentIdentity,
    query: web::Query<TestEmailQuery>,
) -> ApiResult<web::Json<TestEmailReceipt>> {
    let email = EmailAddress::new(query.into_inner().email)?;
    let receipt = state.accounts.send_test_emails(&email).await?;
    info!(
        requested_by = %caller.id,
        email_task_id = %receipt.email_task_id,
        test_task_id = %receipt.test_task_id,
        "test emails queued"
    );
    Ok(web::Json(receipt))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
