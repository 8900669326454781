//! Tests for order handlers.

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

fn complete_draft() -> Value {
    json!({
        "category": "eletricista",
        "description": "Trocar a fiação do chuveiro e instalar um disjuntor novo",
        "postalCode": "01310-100",
        "street": "Avenida Paulista",
        "number": "1578",
        "neighborhood": "Bela Vista",
        "city": "São Paulo",
        "region": "SP",
        "contactPhone": "(11) 91234-5678",
        "deadline": "URGENT",
    })
}

async fn check_step(step: &str, draft: Value) -> Value {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;
    actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders/drafts/validate")
            .set_json(json!({ "step": step, "draft": draft }))
            .to_request(),
    )
    .await
}

#[rstest]
#[actix_web::test]
async fn valid_step_points_to_the_next_one() {
    let check = check_step("CATEGORY", json!({ "category": "eletricista" })).await;
    assert_eq!(check["valid"], true);
    assert_eq!(check["nextStep"], "DESCRIPTION");
    assert_eq!(check["issues"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn invalid_step_reports_issues_without_next_step() {
    let check = check_step("DESCRIPTION", json!({ "description": "curta" })).await;
    assert_eq!(check["valid"], false);
    assert_eq!(check["nextStep"], Value::Null);
    assert_eq!(check["issues"][0]["field"], "description");
}

#[rstest]
#[actix_web::test]
async fn review_step_validates_the_whole_draft() {
    let check = check_step("REVIEW", complete_draft()).await;
    assert_eq!(check["valid"], true);
    assert_eq!(check["nextStep"], Value::Null);

    let empty = check_step("REVIEW", json!({})).await;
    let fields: Vec<&str> = empty["issues"]
        .as_array()
        .expect("issues")
        .iter()
        .filter_map(|issue| issue["field"].as_str())
        .collect();
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"deadline"));
}

#[rstest]
#[actix_web::test]
async fn client_publishes_and_lists_orders() {
    let ctx = TestContext::new();
    seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie.clone())
            .set_json(complete_draft())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let order: Value = actix_test::read_body_json(created).await;
    assert_eq!(order["status"], "OPEN");
    assert_eq!(order["leadPrice"], 10);
    assert_eq!(order["deadline"], "URGENT");

    let mine: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/orders/mine")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let fetched: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{}", order["id"].as_str().expect("id")))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(fetched["contactPhone"], order["contactPhone"]);
}

#[rstest]
#[actix_web::test]
async fn incomplete_draft_is_rejected_with_issues() {
    let ctx = TestContext::new();
    seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie)
            .set_json(json!({ "category": "eletricista" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["step"], "DESCRIPTION");
    assert!(
        body["details"]["issues"]
            .as_array()
            .is_some_and(|issues| !issues.is_empty())
    );
}

#[rstest]
#[actix_web::test]
async fn professionals_cannot_publish_orders() {
    let ctx = TestContext::new();
    seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "carla@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie)
            .set_json(complete_draft())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn professional_sees_redacted_order_before_unlocking() {
    let ctx = TestContext::new();
    let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    let order = open_order(bruno.id(), "eletricista", 10, fixture_time());
    let order_id = order.id;
    assert!(ctx.store.seed_order(order));
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "carla@example.com").await;

    let view: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{order_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(view["unlocked"], false);
    assert!(view.get("contactPhone").is_none());
    assert!(view.get("address").is_none());
}

#[rstest]
#[actix_web::test]
async fn owner_closes_order_crediting_the_hired_professional() {
    let ctx = TestContext::new();
    let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    let carla = seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
    let mut order = open_order(bruno.id(), "eletricista", 10, fixture_time());
    order.unlocked_by.push(carla.id().clone());
    let order_id = order.id;
    assert!(ctx.store.seed_order(order));
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "bruno@example.com").await;
    let uri = format!("/api/v1/orders/{order_id}/close");

    let closed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({ "hiredProfessionalId": carla.id().to_string() }))
            .to_request(),
    )
    .await;
    assert_eq!(closed["status"], "CLOSED");

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let page: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/professionals/{}", carla.id()))
            .to_request(),
    )
    .await;
    assert_eq!(page["completedJobs"], 1);
}

#[rstest]
#[actix_web::test]
async fn only_the_owner_may_close() {
    let ctx = TestContext::new();
    let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
    seed_user(&ctx.store, Role::Client, "Ana Souza", "ana");
    let order = open_order(bruno.id(), "eletricista", 10, fixture_time());
    let order_id = order.id;
    assert!(ctx.store.seed_order(order));
    let app = actix_test::init_service(ctx.app()).await;
    let cookie = login_cookie(&app, "ana@example.com").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/orders/{order_id}/close"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
