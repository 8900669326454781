//! Behaviour tests for registration, login and logout.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared world helpers are used unevenly across suites.
#[allow(dead_code)]
#[path = "support/marketplace_world.rs"]
mod harness;

use actix_web::http::Method;
use harness::{
    WorldFixture, attempt_login, given_user, last_body, last_status, last_trace_id, log_in,
    register, request,
};
use marketplace::domain::Role;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

fn slug(name: &str) -> String {
    name.to_lowercase()
}

#[given("a registered client named {name}")]
fn a_registered_client(world: &WorldFixture, name: String) {
    given_user(&world.world(), Role::Client, &format!("{name} Lima"), &slug(&name));
}

#[given("the client {name} has signed in")]
fn has_signed_in(world: &WorldFixture, name: String) {
    log_in(&world.world(), &slug(&name));
}

#[when("the visitor {name} registers as a {role}")]
fn registers_as(world: &WorldFixture, name: String, role: String) {
    register(&world.world(), &slug(&name), &format!("{name} Souza"), &role);
}

#[when("the client {name} signs out")]
fn signs_out(world: &WorldFixture, name: String) {
    let world = world.world();
    request(&world, Some(&slug(&name)), Method::POST, "/api/v1/logout", None);
    assert_eq!(last_status(&world), 204);
}

#[when("the client {name} signs in with a wrong password")]
fn signs_in_with_a_wrong_password(world: &WorldFixture, name: String) {
    attempt_login(&world.world(), &slug(&name), "senha-errada-456");
}

#[then("the account is created with role {role}")]
fn the_account_is_created(world: &WorldFixture, role: String) {
    let world = world.world();
    assert_eq!(last_status(&world), 201);
    assert_eq!(last_body(&world)["role"].as_str(), Some(role.as_str()));
}

#[then("the visitor {name} is the current user")]
fn is_the_current_user(world: &WorldFixture, name: String) {
    let world = world.world();
    request(&world, Some(&slug(&name)), Method::GET, "/api/v1/users/me", None);
    assert_eq!(last_status(&world), 200);
    let body = last_body(&world);
    assert_eq!(
        body["email"].as_str(),
        Some(format!("{}@example.com", slug(&name)).as_str())
    );
}

#[then("the registration is refused as a conflict")]
fn the_registration_is_refused(world: &WorldFixture) {
    let world = world.world();
    assert_eq!(last_status(&world), 409);
    assert_eq!(last_body(&world)["code"].as_str(), Some("conflict"));
}

#[then("the current user request is unauthorised with a trace id")]
fn the_current_user_request_is_unauthorised(world: &WorldFixture) {
    let world = world.world();
    request(&world, Some("bruno"), Method::GET, "/api/v1/users/me", None);
    assert_eq!(last_status(&world), 401);
    assert_eq!(last_body(&world)["code"].as_str(), Some("unauthorized"));
    assert!(last_trace_id(&world).is_some_and(|id| !id.is_empty()));
}

#[then("sign-in is refused as unauthorised")]
fn sign_in_is_refused(world: &WorldFixture) {
    let world = world.world();
    assert_eq!(last_status(&world), 401);
    assert_eq!(last_body(&world)["code"].as_str(), Some("unauthorized"));
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Registering a professional opens a session"
)]
fn registering_a_professional_opens_a_session(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Registering an e-mail twice is refused"
)]
fn registering_an_e_mail_twice_is_refused(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Signing out ends the session"
)]
fn signing_out_ends_the_session(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "A wrong password is refused"
)]
fn a_wrong_password_is_refused(world: WorldFixture) {
    drop(world);
}
