//! Steps shared by every HTTP behaviour suite.

use rstest_bdd_macros::{given, then};

use crate::harness::{WorldFixture, last_message, last_status, register_and_login};

#[given("a running blog server")]
fn a_running_blog_server(world: &WorldFixture) {
    let _ = world;
}

#[given("user {user} is registered and logged in")]
fn user_is_registered_and_logged_in(world: &WorldFixture, user: String) {
    register_and_login(&world.world(), &user);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(last_status(&world.world()), status);
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &WorldFixture, message: String) {
    assert_eq!(last_message(&world.world()), message.trim_matches('"'));
}
