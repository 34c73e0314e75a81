//! Behaviour tests for the authentication gate.
//!
//! These scenarios cover token precedence between the `access_token` cookie
//! and the bearer header, trace identifiers on rejections, and deactivated
//! accounts.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared harness exposes helpers other suites use.
#[allow(dead_code)]
#[path = "support/harness.rs"]
mod harness;
#[path = "support/steps.rs"]
mod steps;

use actix_web::http::Method;
use blog_backend::domain::EmailAddress;
use harness::{Credentials, RequestSpec, WorldFixture, email_for, send, token_for};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

const BOGUS_TOKEN: &str = "not.a.token";

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

#[given("{user} has been deactivated")]
fn user_has_been_deactivated(world: &WorldFixture, user: String) {
    let email = EmailAddress::new(email_for(&user)).expect("valid email");
    assert!(world.world().borrow().store.set_active(&email, false));
}

#[when("an anonymous client requests article {id}")]
fn anonymous_client_requests_article(world: &WorldFixture, id: i64) {
    let path = format!("/article/{id}");
    send(&world.world(), RequestSpec::new(Method::GET, &path));
}

#[when("{user} fetches article {id} with their cookie and a bogus bearer header")]
fn fetch_with_cookie_and_bogus_bearer(world: &WorldFixture, user: String, id: i64) {
    let world = world.world();
    let path = format!("/article/{id}");
    let credentials = Credentials::Both {
        cookie: token_for(&world, &user),
        bearer: BOGUS_TOKEN.to_owned(),
    };
    send(
        &world,
        RequestSpec::new(Method::GET, &path).credentials(credentials),
    );
}

#[when("{user} fetches article {id} with a bogus cookie and their bearer header")]
fn fetch_with_bogus_cookie_and_bearer(world: &WorldFixture, user: String, id: i64) {
    let world = world.world();
    let path = format!("/article/{id}");
    let credentials = Credentials::Both {
        cookie: BOGUS_TOKEN.to_owned(),
        bearer: token_for(&world, &user),
    };
    send(
        &world,
        RequestSpec::new(Method::GET, &path).credentials(credentials),
    );
}

#[when("{user} creates a category")]
fn user_creates_a_category(world: &WorldFixture, user: String) {
    let world = world.world();
    let credentials = Credentials::Cookie(token_for(&world, &user));
    send(
        &world,
        RequestSpec::new(Method::POST, "/category/")
            .credentials(credentials)
            .json(json!({"name": "News", "slug": "news"})),
    );
}

#[then("the response trace id matches the error body")]
fn trace_id_matches_body(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let header = ctx.last.trace_id.as_deref().expect("trace id header");
    let body = ctx.last.body.as_ref().expect("error body");
    assert_eq!(body["traceId"], header);
    assert_eq!(body["code"], "unauthorized");
}

#[scenario(
    path = "tests/features/auth_gate.feature",
    name = "Anonymous requests are rejected with a trace identifier"
)]
fn anonymous_requests_are_rejected_with_trace_id(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_gate.feature",
    name = "A valid cookie wins over a bogus bearer header"
)]
fn valid_cookie_wins_over_bogus_bearer(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_gate.feature",
    name = "A bogus cookie is not rescued by a valid bearer header"
)]
fn bogus_cookie_is_not_rescued_by_valid_bearer(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_gate.feature",
    name = "Deactivated users are turned away"
)]
fn deactivated_users_are_turned_away(world: WorldFixture) {
    drop(world);
}
