//! Admission tests for the bearer token gate.

use super::*;
use crate::domain::{AuthClaims, EmailAddress, UserId};
use crate::inbound::http::test_utils::test_tokens;
use crate::test_support::MutableClock;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::{fixture, rstest};

struct Gate {
    tokens: Arc<TokenService>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn gate() -> Gate {
    let (tokens, clock) = test_tokens();
    Gate { tokens, clock }
}

impl Gate {
    fn token(&self) -> String {
        let email = EmailAddress::new("a@x.com").expect("valid email");
        self.tokens
            .issue(UserId::random(), &email, None)
            .expect("issue token")
            .token
    }

    fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse<EitherBody<actix_web::body::BoxBody>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .wrap(AuthGate::new(self.tokens.clone()))
            .route(
                "/article/",
                web::get().to(|| async { HttpResponse::Ok().body("public") }),
            )
            .route(
                "/article/{id}",
                web::get().to(|claims: web::ReqData<AuthClaims>| async move {
                    HttpResponse::Ok().body(claims.sub.clone())
                }),
            )
    }
}

async fn error_message(res: ServiceResponse<EitherBody<actix_web::body::BoxBody>>) -> String {
    let body: Error = actix_test::read_body_json(res).await;
    body.message().to_owned()
}

#[rstest]
#[case("/auth/login", true)]
#[case("/user/", true)]
#[case("/user/test-email", false)]
#[case("/category/", true)]
#[case("/category/3", false)]
#[case("/article", false)]
#[case("/docs/", true)]
#[case("/docs/openapi.json", true)]
#[case("/health/live", true)]
#[case("/auth/logout", false)]
fn public_paths_match_exactly(#[case] path: &str, #[case] public: bool) {
    assert_eq!(is_public_path(path), public);
}

#[rstest]
#[actix_web::test]
async fn public_path_needs_no_token(gate: Gate) {
    let app = actix_test::init_service(gate.app()).await;
    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/article/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn missing_token_is_challenged(gate: Gate) {
    let app = actix_test::init_service(gate.app()).await;
    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/article/1").to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    assert_eq!(error_message(res).await, NOT_AUTHENTICATED);
}

#[rstest]
#[actix_web::test]
async fn header_token_is_admitted_and_claims_attached(gate: Gate) {
    let token = gate.token();
    let app = actix_test::init_service(gate.app()).await;
    let req = actix_test::TestRequest::get()
        .uri("/article/1")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(actix_test::read_body(res).await, "a@x.com");
}

#[rstest]
#[actix_web::test]
async fn cookie_token_is_admitted(gate: Gate) {
    let token = gate.token();
    let app = actix_test::init_service(gate.app()).await;
    let req = actix_test::TestRequest::get()
        .uri("/article/1")
        .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn invalid_cookie_is_not_rescued_by_valid_header(gate: Gate) {
    let token = gate.token();
    let app = actix_test::init_service(gate.app()).await;
    let req = actix_test::TestRequest::get()
        .uri("/article/1")
        .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "garbage"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(res).await, "Invalid token");
}

#[rstest]
#[actix_web::test]
async fn expired_token_reports_expiry(gate: Gate) {
    let token = gate.token();
    gate.clock.advance_seconds(31 * 60);
    let app = actix_test::init_service(gate.app()).await;
    let req = actix_test::TestRequest::get()
        .uri("/article/1")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(res).await, "Token has expired");
}

#[rstest]
#[case("Basic abc")]
#[case("Bearer ")]
#[case("Bearer")]
#[actix_web::test]
async fn malformed_authorization_header_counts_as_missing(gate: Gate, #[case] value: &str) {
    let app = actix_test::init_service(gate.app()).await;
    let req = actix_test::TestRequest::get()
        .uri("/article/1")
        .insert_header((header::AUTHORIZATION, value))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(res).await, NOT_AUTHENTICATED);
}
