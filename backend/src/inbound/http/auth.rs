//! Login and logout handlers.
//!
//! ```text
//! POST /auth/login        username=a@x.com&password=pw1
//! POST /auth/login-form   {"email":"a@x.com","password":"pw1"}
//! POST /auth/logout
//! ```
//!
//! Both login routes answer with the token in the body and in the
//! `access_token` cookie. Logout only clears cookies; the token itself stays
//! valid until it expires.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{AuthClaims, Error, LoginCredentials, LoginValidationError};

use super::ApiResult;
use super::cookies::{login_cookies, logout_cookies};
use super::state::HttpState;

/// Form body for `POST /auth/login`; `username` holds the email.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// JSON body for `POST /auth/login-form`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token returned by both login routes.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Confirmation body for deletions and logout.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

async fn issue_session(
    state: &HttpState,
    credentials: LoginCredentials,
) -> ApiResult<HttpResponse> {
    let issued = state.login.login(&credentials).await?;
    info!(user_id = %issued.claims.user_id, "login succeeded");
    let mut response = HttpResponse::Ok();
    for cookie in login_cookies(&issued, state.cookies) {
        response.cookie(cookie);
    }
    Ok(response.json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_owned(),
    }))
}

/// Exchange form credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse,
            headers(("Set-Cookie" = String, description = "access_token and user_id cookies"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let LoginForm { username, password } = form.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(map_login_validation_error)?;
    issue_session(&state, credentials).await
}

/// Exchange JSON credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login-form",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error)
    ),
    tags = ["auth"],
    operation_id = "loginJson",
    security([])
)]
#[post("/auth/login-form")]
pub async fn login_form(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    issue_session(&state, credentials).await
}

/// Clear the auth cookies.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Cookies cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(claims: web::ReqData<AuthClaims>) -> HttpResponse {
    info!(user_id = %claims.user_id, "logout");
    let mut response = HttpResponse::Ok();
    for cookie in logout_cookies() {
        response.cookie(cookie);
    }
    response.json(MessageResponse::new("Logged out successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLoginService;
    use crate::domain::{EmailAddress, ErrorCode, IssuedToken, UserId};
    use crate::inbound::http::auth_gate::AuthGate;
    use crate::inbound::http::cookies::{ACCESS_TOKEN_COOKIE, USER_ID_COOKIE};
    use crate::inbound::http::test_utils::{TestPorts, test_tokens};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    fn login_ok() -> MockLoginService {
        let (tokens, _clock) = test_tokens();
        let mut login_port = MockLoginService::new();
        login_port
            .expect_login()
            .withf(|creds| creds.email().as_ref() == "a@x.com" && creds.password() == "pw1")
            .returning(move |creds| {
                tokens
                    .issue(UserId::random(), creds.email(), None)
                    .map_err(Error::from)
            });
        login_port
    }

    fn login_rejecting() -> MockLoginService {
        let mut login_port = MockLoginService::new();
        login_port
            .expect_login()
            .returning(|_| Err(Error::unauthorized("Incorrect email or password")));
        login_port
    }

    fn state(login_port: MockLoginService) -> web::Data<HttpState> {
        TestPorts {
            login: login_port,
            ..TestPorts::default()
        }
        .into_state()
    }

    #[rstest]
    #[actix_web::test]
    async fn form_login_sets_both_cookies() {
        let app = actix_test::init_service(App::new().app_data(state(login_ok())).service(login)).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_form([("username", "a@x.com"), ("password", "pw1")])
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let access = res
            .response()
            .cookies()
            .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
            .expect("access_token cookie");
        assert_eq!(access.http_only(), Some(true));
        let user_id = res
            .response()
            .cookies()
            .find(|c| c.name() == USER_ID_COOKIE)
            .expect("user_id cookie");
        assert!(UserId::new(user_id.value()).is_ok());
        let access_value = access.value().to_owned();

        let body: TokenResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.token_type, "bearer");
        assert_eq!(body.access_token, access_value);
    }

    #[rstest]
    #[actix_web::test]
    async fn json_login_returns_token() {
        let app =
            actix_test::init_service(App::new().app_data(state(login_ok())).service(login_form)).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login-form")
            .set_json(LoginRequest {
                email: "a@x.com".into(),
                password: "pw1".into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: TokenResponse = actix_test::read_body_json(res).await;
        assert!(!body.access_token.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let app =
            actix_test::init_service(App::new().app_data(state(login_rejecting())).service(login)).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_form([("username", "a@x.com"), ("password", "nope")])
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().next().is_none());
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.message(), "Incorrect email or password");
    }

    #[rstest]
    #[case("not-an-email", "pw1", "email", "invalid_email")]
    #[case("a@x.com", "", "password", "empty_password")]
    #[actix_web::test]
    async fn malformed_credentials_are_rejected_before_lookup(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut login_port = MockLoginService::new();
        login_port.expect_login().never();
        let app =
            actix_test::init_service(App::new().app_data(state(login_port)).service(login_form)).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login-form")
            .set_json(LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
        assert_eq!(value["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_clears_both_cookies() {
        let (tokens, _clock) = test_tokens();
        let email = EmailAddress::new("a@x.com").expect("valid email");
        let IssuedToken { token, .. } = tokens.issue(UserId::random(), &email, None).expect("token");
        let app = actix_test::init_service(App::new().wrap(AuthGate::new(tokens)).service(logout)).await;

        let req = actix_test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cleared: Vec<_> = res
            .response()
            .cookies()
            .filter(|c| c.value().is_empty())
            .map(|c| c.name().to_owned())
            .collect();
        assert_eq!(cleared, [ACCESS_TOKEN_COOKIE, USER_ID_COOKIE]);
        let body: MessageResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.message, "Logged out successfully");
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_without_token_is_rejected() {
        let (tokens, _clock) = test_tokens();
        let app = actix_test::init_service(App::new().wrap(AuthGate::new(tokens)).service(logout)).await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::post().uri("/auth/logout").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::Unauthorized);
    }
}
