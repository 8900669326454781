//! Behaviour tests for the public directory and client reviews.
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
    WorldFixture, given_open_order, given_professional, given_user, last_body, last_status,
    log_in, request, user_id,
};
use marketplace::domain::Role;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

fn slug(name: &str) -> String {
    name.to_lowercase()
}

#[given("an {category} professional named {name} with {credits} credits")]
fn a_listed_professional(world: &WorldFixture, category: String, name: String, credits: u32) {
    let display_name = format!("{name} Dias");
    given_professional(&world.world(), &display_name, &slug(&name), &category, credits);
}

#[given("a {category} professional named {name} with {credits} credits")]
fn another_listed_professional(world: &WorldFixture, category: String, name: String, credits: u32) {
    let display_name = format!("{name} Souza");
    given_professional(&world.world(), &display_name, &slug(&name), &category, credits);
}

#[given("a client whose order {name} unlocked")]
fn a_client_whose_order_was_unlocked(world: &WorldFixture, name: String) {
    let world = world.world();
    given_user(&world, Role::Client, "Bruno Lima", "bruno");
    given_open_order(&world, "bruno", "eletricista", 10, Some(&slug(&name)));
    log_in(&world, "bruno");
}

#[given("a client without orders")]
fn a_client_without_orders(world: &WorldFixture) {
    let world = world.world();
    given_user(&world, Role::Client, "Bruno Lima", "bruno");
    log_in(&world, "bruno");
}

#[when("a visitor searches the directory for {category}")]
fn a_visitor_searches_the_directory(world: &WorldFixture, category: String) {
    let path = format!("/api/v1/professionals?category={category}");
    request(&world.world(), None, Method::GET, &path, None);
}

#[when("the client reviews {name} with {stars} stars")]
fn the_client_reviews(world: &WorldFixture, name: String, stars: i64) {
    let world = world.world();
    let path = format!("/api/v1/professionals/{}/reviews", user_id(&world, &slug(&name)));
    let payload = json!({ "stars": stars, "comment": "Pontual e caprichosa" });
    request(&world, Some("bruno"), Method::POST, &path, Some(payload));
}

#[then("the directory lists only {name}")]
fn the_directory_lists_only(world: &WorldFixture, name: String) {
    let world = world.world();
    assert_eq!(last_status(&world), 200);
    let body = last_body(&world);
    let cards = body.as_array().expect("directory cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(
        cards.first().map(|card| card["id"].clone()),
        Some(Value::String(user_id(&world, &slug(&name))))
    );
}

#[then("no directory card carries a credit balance")]
fn no_directory_card_carries_credits(world: &WorldFixture) {
    let body = last_body(&world.world());
    let cards = body.as_array().expect("directory cards");
    assert!(cards.iter().all(|card| card.get("credits").is_none()));
}

#[then("the review is accepted")]
fn the_review_is_accepted(world: &WorldFixture) {
    assert_eq!(last_status(&world.world()), 201);
}

#[then("the review is rejected as a conflict")]
fn the_review_is_rejected_as_a_conflict(world: &WorldFixture) {
    let world = world.world();
    assert_eq!(last_status(&world), 409);
    assert_eq!(last_body(&world)["code"].as_str(), Some("conflict"));
}

#[then("the review is forbidden")]
fn the_review_is_forbidden(world: &WorldFixture) {
    assert_eq!(last_status(&world.world()), 403);
}

#[then("the profile of {name} shows a rating of {rating} from {count} review")]
fn the_profile_shows_a_rating(world: &WorldFixture, name: String, rating: f64, count: u64) {
    let world = world.world();
    let path = format!("/api/v1/professionals/{}", user_id(&world, &slug(&name)));
    request(&world, None, Method::GET, &path, None);
    assert_eq!(last_status(&world), 200);
    let body = last_body(&world);
    assert_eq!(body["rating"].as_f64(), Some(rating));
    assert_eq!(body["reviewCount"].as_u64(), Some(count));
}

#[scenario(
    path = "tests/features/directory_reviews.feature",
    name = "Directory search filters by category without exposing credits"
)]
fn directory_search_filters_by_category_without_exposing_credits(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/directory_reviews.feature",
    name = "An engaged client reviews a professional once"
)]
fn an_engaged_client_reviews_a_professional_once(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/directory_reviews.feature",
    name = "Clients without an engagement cannot review"
)]
fn clients_without_an_engagement_cannot_review(world: WorldFixture) {
    drop(world);
}
