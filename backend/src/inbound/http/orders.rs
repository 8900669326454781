//! Order wizard and client order handlers.
//!
//! ```text
//! POST /api/v1/orders/drafts/validate {"step":"LOCATION","draft":{...}}
//! POST /api/v1/orders {"category":"eletricista","description":"...",...}
//! GET  /api/v1/orders/mine
//! GET  /api/v1/orders/{id}
//! POST /api/v1/orders/{id}/close {"hiredProfessionalId":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, FieldIssue, NewOrder, OrderDraft, OrderView, OrderWizard, UserId, WizardStep,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_order_id, parse_user_id};

const ORDER_ID: FieldName = FieldName::new("orderId");
const HIRED_PROFESSIONAL_ID: FieldName = FieldName::new("hiredProfessionalId");

/// Body for `POST /api/v1/orders/drafts/validate`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepCheckRequest {
    pub step: WizardStep,
    #[serde(default)]
    pub draft: OrderDraft,
}

/// Result of validating one wizard step.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepCheck {
    pub step: WizardStep,
    pub valid: bool,
    /// Step to show next; absent while the current step has issues or on the
    /// review step.
    pub next_step: Option<WizardStep>,
    pub issues: Vec<FieldIssue>,
}

impl StepCheck {
    fn of(step: WizardStep, draft: &OrderDraft) -> Self {
        let issues = OrderWizard::validate_step(step, draft);
        let valid = issues.is_empty();
        Self {
            step,
            valid,
            next_step: valid.then(|| OrderWizard::next_step(step)).flatten(),
            issues,
        }
    }
}

fn finish_draft(draft: &OrderDraft) -> Result<NewOrder, Error> {
    OrderWizard::finish(draft).map_err(|issues| {
        let first_step = OrderWizard::first_incomplete_step(draft);
        Error::invalid_request("order draft is incomplete")
            .with_details(json!({ "issues": issues, "step": first_step }))
    })
}

/// Body for `POST /api/v1/orders/{id}/close`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseOrderRequest {
    /// Professional who did the job, if any.
    #[serde(default)]
    pub hired_professional_id: Option<String>,
}

impl CloseOrderRequest {
    fn hired(&self) -> Result<Option<UserId>, Error> {
        self.hired_professional_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_user_id(raw, HIRED_PROFESSIONAL_ID))
            .transpose()
    }
}

/// Validate the fields owned by one wizard step.
///
/// Always answers 200; problems are reported as `issues`. Requesting the
/// `REVIEW` step validates the whole draft.
#[utoipa::path(
    post,
    path = "/api/v1/orders/drafts/validate",
    request_body = StepCheckRequest,
    responses(
        (status = 200, description = "Step validation result", body = StepCheck),
        (status = 400, description = "Malformed request", body = Error)
    ),
    tags = ["orders"],
    operation_id = "validateOrderStep",
    security([])
)]
#[post("/orders/drafts/validate")]
pub async fn validate_step(payload: web::Json<StepCheckRequest>) -> web::Json<StepCheck> {
    web::Json(StepCheck::of(payload.step, &payload.draft))
}

/// Publish an order from a completed draft.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = OrderDraft,
    responses(
        (status = 201, description = "Order published", body = OrderView),
        (status = 400, description = "Draft incomplete or invalid", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Only clients publish orders", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OrderDraft>,
) -> ApiResult<HttpResponse> {
    let client = session.require_user_id()?;
    let order = finish_draft(&payload)?;
    let view = state.orders.create_order(&client, order).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Orders published by the authenticated client, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders/mine",
    responses(
        (status = 200, description = "Own orders", body = [OrderView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["orders"],
    operation_id = "myOrders"
)]
#[get("/orders/mine")]
pub async fn my_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<OrderView>>> {
    let client = session.require_user_id()?;
    Ok(web::Json(state.orders_query.my_orders(&client).await?))
}

/// One order as the caller may see it.
///
/// Owners and admins see everything; professionals see the contact details
/// only after unlocking the lead.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Order no longer available", body = Error),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderView>> {
    let viewer = session.require_user_id()?;
    let order_id = parse_order_id(&path, ORDER_ID)?;
    Ok(web::Json(state.orders_query.order(&viewer, &order_id).await?))
}

/// Close an open order, optionally naming the professional who was hired.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/close",
    params(("id" = String, Path, description = "Order id")),
    request_body = CloseOrderRequest,
    responses(
        (status = 200, description = "Closed order", body = OrderView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Order not open", body = Error)
    ),
    tags = ["orders"],
    operation_id = "closeOrder"
)]
#[post("/orders/{id}/close")]
pub async fn close_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Option<web::Json<CloseOrderRequest>>,
) -> ApiResult<web::Json<OrderView>> {
    let client = session.require_user_id()?;
    let order_id = parse_order_id(&path, ORDER_ID)?;
    let hired = payload
        .map(web::Json::into_inner)
        .unwrap_or_default()
        .hired()?;
    Ok(web::Json(
        state.orders.close_order(&client, &order_id, hired).await?,
    ))
}

#[cfg(test)]
mod tests;
