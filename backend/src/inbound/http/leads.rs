//! Lead browsing and unlocking for professionals.
//!
//! ```text
//! GET  /api/v1/leads?category=eletricista&region=SP
//! POST /api/v1/leads/{id}/unlock
//! ```

use actix_web::{get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::{LeadFilter, UnlockReceipt};
use crate::domain::{Error, OrderView, RegionCode, ServiceCategory};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_order_id,
};

const CATEGORY: FieldName = FieldName::new("category");
const REGION: FieldName = FieldName::new("region");
const ORDER_ID: FieldName = FieldName::new("orderId");

/// Lead search criteria. With neither set, the caller's own categories and
/// region apply.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadParams {
    pub category: Option<String>,
    pub region: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

impl TryFrom<&LeadParams> for LeadFilter {
    type Error = Error;

    fn try_from(params: &LeadParams) -> Result<Self, Self::Error> {
        let category = non_blank(params.category.as_deref())
            .map(|raw| {
                ServiceCategory::new(raw).map_err(|err| invalid_value_error(CATEGORY, raw, err))
            })
            .transpose()?;
        let region = non_blank(params.region.as_deref())
            .map(|raw| {
                raw.parse::<RegionCode>()
                    .map_err(|err| invalid_value_error(REGION, raw, err))
            })
            .transpose()?;
        Ok(Self { category, region })
    }
}

/// Open orders the authenticated professional may buy, newest first.
///
/// Contact details are redacted until the lead is unlocked.
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    params(LeadParams),
    responses(
        (status = 200, description = "Available leads", body = [OrderView]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a professional", body = Error)
    ),
    tags = ["leads"],
    operation_id = "listLeads"
)]
#[get("/leads")]
pub async fn list_leads(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<LeadParams>,
) -> ApiResult<web::Json<Vec<OrderView>>> {
    let professional = session.require_user_id()?;
    let filter = LeadFilter::try_from(&params.into_inner())?;
    Ok(web::Json(
        state.orders_query.leads(&professional, filter).await?,
    ))
}

/// Spend credits to reveal an order's address and contact phone.
///
/// Unlocking the same lead twice is free and returns `charged: false`.
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/unlock",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Lead unlocked", body = UnlockReceipt),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 402, description = "Not enough credits", body = Error),
        (status = 403, description = "Not a professional", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Order no longer open", body = Error)
    ),
    tags = ["leads"],
    operation_id = "unlockLead"
)]
#[post("/leads/{id}/unlock")]
pub async fn unlock_lead(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UnlockReceipt>> {
    let professional = session.require_user_id()?;
    let order_id = parse_order_id(&path, ORDER_ID)?;
    Ok(web::Json(state.leads.unlock(&professional, &order_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestContext, login_cookie};
    use crate::test_support::clock::fixture_time;
    use crate::test_support::doubles::{seed_professional, seed_user};
    use crate::test_support::fixtures::open_order;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn leads_follow_the_profile_and_hide_contacts() {
        let ctx = TestContext::new();
        let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
        seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
        assert!(ctx.store.seed_order(open_order(bruno.id(), "eletricista", 10, fixture_time())));
        assert!(ctx.store.seed_order(open_order(bruno.id(), "pintor", 10, fixture_time())));
        let app = actix_test::init_service(ctx.app()).await;
        let cookie = login_cookie(&app, "carla@example.com").await;

        let own: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/leads")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let own = own.as_array().expect("leads");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0]["category"], "eletricista");
        assert!(own[0].get("contactPhone").is_none());

        let painters: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/leads?category=pintor")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(painters[0]["category"], "pintor");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_region_is_rejected() {
        let ctx = TestContext::new();
        seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 40);
        let app = actix_test::init_service(ctx.app()).await;
        let cookie = login_cookie(&app, "carla@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/leads?region=XX")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "region");
        assert_eq!(body["details"]["value"], "XX");
    }

    #[rstest]
    #[actix_web::test]
    async fn unlock_charges_once_and_reveals_contact() {
        let ctx = TestContext::new();
        let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
        seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 25);
        let order = open_order(bruno.id(), "eletricista", 10, fixture_time());
        let order_id = order.id;
        assert!(ctx.store.seed_order(order));
        let app = actix_test::init_service(ctx.app()).await;
        let cookie = login_cookie(&app, "carla@example.com").await;
        let uri = format!("/api/v1/leads/{order_id}/unlock");

        let first: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri(&uri)
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(first["charged"], true);
        assert_eq!(first["remainingCredits"], 15);
        assert_eq!(first["order"]["unlocked"], true);
        assert!(first["order"]["contactPhone"].is_string());

        let second: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri(&uri)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(second["charged"], false);
        assert_eq!(second["remainingCredits"], 15);
    }

    #[rstest]
    #[actix_web::test]
    async fn unlock_without_credits_is_payment_required() {
        let ctx = TestContext::new();
        let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
        seed_professional(&ctx.store, "Carla Dias", "carla", "eletricista", 5);
        let order = open_order(bruno.id(), "eletricista", 10, fixture_time());
        let order_id = order.id;
        assert!(ctx.store.seed_order(order));
        let app = actix_test::init_service(ctx.app()).await;
        let cookie = login_cookie(&app, "carla@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/leads/{order_id}/unlock"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "insufficient_credits");
        assert_eq!(body["details"]["balance"], 5);
        assert_eq!(body["details"]["price"], 10);
    }

    #[rstest]
    #[actix_web::test]
    async fn clients_cannot_unlock() {
        let ctx = TestContext::new();
        let bruno = seed_user(&ctx.store, Role::Client, "Bruno Lima", "bruno");
        let order = open_order(bruno.id(), "eletricista", 10, fixture_time());
        let order_id = order.id;
        assert!(ctx.store.seed_order(order));
        let app = actix_test::init_service(ctx.app()).await;
        let cookie = login_cookie(&app, "bruno@example.com").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/leads/{order_id}/unlock"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
