//! Behaviour tests for article ownership and tombstoning.
//!
//! These scenarios drive the assembled server over HTTP and check the
//! in-memory store for the tombstone a delete leaves behind.
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
use harness::{Credentials, RequestSpec, SharedWorld, WorldFixture, send, token_for};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

fn bearer(world: &SharedWorld, user: &str) -> Credentials {
    Credentials::Bearer(token_for(world, user))
}

fn created_id(world: &SharedWorld, label: &str) -> i64 {
    let ctx = world.borrow();
    assert_eq!(ctx.last.status, Some(200), "{label}");
    ctx.last
        .body
        .as_ref()
        .and_then(|body| body["id"].as_i64())
        .unwrap_or_else(|| panic!("{label} returned an id"))
}

fn article_path(world: &SharedWorld) -> String {
    let id = world.borrow().article_id.expect("an article was created");
    format!("/article/{id}")
}

#[given("{user} has created a category")]
fn user_has_created_a_category(world: &WorldFixture, user: String) {
    let world = world.world();
    send(
        &world,
        RequestSpec::new(Method::POST, "/category/")
            .credentials(bearer(&world, &user))
            .json(json!({"name": "News", "slug": "news"})),
    );
    let id = created_id(&world, "create category");
    world.borrow_mut().category_id = Some(id);
}

#[given("{user} has created an article in that category")]
fn user_has_created_an_article(world: &WorldFixture, user: String) {
    let world = world.world();
    let category_id = world.borrow().category_id.expect("a category was created");
    send(
        &world,
        RequestSpec::new(Method::POST, "/article/")
            .credentials(bearer(&world, &user))
            .json(json!({
                "title": "Hello",
                "content": "First post",
                "category_id": category_id,
            })),
    );
    let id = created_id(&world, "create article");
    world.borrow_mut().article_id = Some(id);
}

#[when("{user} updates the article")]
fn user_updates_the_article(world: &WorldFixture, user: String) {
    let world = world.world();
    let path = article_path(&world);
    send(
        &world,
        RequestSpec::new(Method::PUT, &path)
            .credentials(bearer(&world, &user))
            .json(json!({"title": "Hijacked"})),
    );
}

#[when("{user} deletes the article")]
fn user_deletes_the_article(world: &WorldFixture, user: String) {
    let world = world.world();
    let path = article_path(&world);
    send(
        &world,
        RequestSpec::new(Method::DELETE, &path).credentials(bearer(&world, &user)),
    );
}

#[then("exactly one tombstone records the deleted article")]
fn exactly_one_tombstone(world: &WorldFixture) {
    let world = world.world();
    let ctx = world.borrow();
    let article_id = ctx.article_id.expect("an article was created");
    let tombstones = ctx.store.tombstones();
    assert_eq!(tombstones.len(), 1);
    assert_eq!(i64::from(tombstones[0].original_id.0), article_id);
    assert_eq!(tombstones[0].title, "Hello");
}

#[scenario(
    path = "tests/features/article_ownership.feature",
    name = "Another user cannot update an article and the author deletes it"
)]
fn another_user_cannot_update_and_author_deletes(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/article_ownership.feature",
    name = "Deleting an article twice reports it missing"
)]
fn deleting_an_article_twice_reports_it_missing(world: WorldFixture) {
    drop(world);
}
