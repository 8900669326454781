//! Tests for directory, profile and review handlers.

use super::*;
use crate::domain::Role;
use crate::inbound::http::test_utils::{TestContext, login_cookie};
use crate::test_support::clock::fixture_time;
use crate::test_support::doubles::{seed_professional, seed_user};
use crate::test_support::fixtures::open_order;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[case("category=Encanador!", "category", "invalid_value")]
#[case("region=XX", "region", "invalid_value")]
#[case("minRating=6", "minRating", "out_of_range")]
#[case("minRating=alto", "minRating", "invalid_value")]
#[actix_web::test]
async fn search_rejects_invalid_filters(
    #[case] query: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/professionals?{query}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn search_filters_by_category_and_hides_credits() {
    let ctx = TestContext::new();
    seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    seed_professional(&ctx.store, "Davi Rocha", "davi", "encanador", 40);
    seed_user(&ctx.store, Role::Professional, "Elisa Prado", "elisa");
    let app = actix_test::init_service(ctx.app()).await;

    let cards: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/professionals?category=eletricista&region=sp")
            .to_request(),
    )
    .await;
    let cards = cards.as_array().expect("array of cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["displayName"], "Carla Dias");
    assert!(cards[0].get("credits").is_none());
}

#[rstest]
#[actix_web::test]
async fn own_profile_is_reserved_for_professionals() {
    let ctx = TestContext::new();
    seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/professionals/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn update_profile_lists_a_new_professional() {
    let ctx = TestContext::new();
    let elisa = seed_user(&ctx.store, Role::Professional, "Elisa Prado", "elisa");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "elisa@example.com").await;

    let hidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/professionals/{}", elisa.id()))
            .to_request(),
    )
    .await;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    let own: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/professionals/me")
            .cookie(cookie)
            .set_json(json!({
                "description": "Pintura residencial e comercial",
                "categories": ["pintor"],
                "region": "RJ",
                "phone": "(21) 98765-4321",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(own["categories"], json!(["pintor"]));
    assert_eq!(own["region"], "RJ");
    assert_eq!(own["credits"], 0);

    let page: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/professionals/{}", elisa.id()))
            .to_request(),
    )
    .await;
    assert_eq!(page["displayName"], "Elisa Prado");
    assert_eq!(page["reviews"], json!([]));
    assert!(page.get("credits").is_none());
}

#[rstest]
#[case(json!({"categories": ["pintor"], "region": "ZZ", "phone": "21987654321"}), "region")]
#[case(json!({"categories": ["pintor"], "phone": "21987654321"}), "region")]
#[case(json!({"categories": [], "region": "RJ", "phone": "21987654321"}), "categories")]
#[case(json!({"categories": ["pintor"], "region": "RJ", "phone": "123"}), "phone")]
#[actix_web::test]
async fn update_profile_reports_the_offending_field(#[case] payload: Value, #[case] field: &str) {
    let ctx = TestContext::new();
    seed_user(&ctx.store, Role::Professional, "Elisa Prado", "elisa");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "elisa@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/professionals/me")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn profile_rejects_malformed_ids() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/professionals/not-a-uuid")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn engaged_client_reviews_once() {
    let ctx = TestContext::new();
    let carla = seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let mut order = open_order(bruno.id(), "eletricista", 10, fixture_time());
    order.unlocked_by.push(carla.id().clone());
    assert!(ctx.store.seed_order(order));
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;
    let uri = format!("/api/v1/professionals/{}/reviews", carla.id());

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({ "stars": 5, "comment": "Pontual e caprichosa" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let review: Value = actix_test::read_body_json(created).await;
    assert_eq!(review["stars"], 5);

    let repeated = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie)
            .set_json(json!({ "stars": 4 }))
            .to_request(),
    )
    .await;
    assert_eq!(repeated.status(), StatusCode::CONFLICT);

    let page: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/professionals/{}", carla.id()))
            .to_request(),
    )
    .await;
    assert_eq!(page["reviewCount"], 1);
    assert_eq!(page["rating"], 5.0);
    assert_eq!(page["reviews"][0]["comment"], "Pontual e caprichosa");
}

#[rstest]
#[actix_web::test]
async fn review_requires_an_unlocked_order() {
    let ctx = TestContext::new();
    let carla = seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/professionals/{}/reviews", carla.id()))
            .cookie(cookie)
            .set_json(json!({ "stars": 3 }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(-1)]
#[actix_web::test]
async fn review_rejects_stars_out_of_range(#[case] stars: i64) {
    let ctx = TestContext::new();
    let carla = seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/professionals/{}/reviews", carla.id()))
            .cookie(cookie)
            .set_json(json!({ "stars": stars }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "stars");
    assert_eq!(body["details"]["code"], "out_of_range");
}
