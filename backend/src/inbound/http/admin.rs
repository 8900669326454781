//! Admin dashboard and intervention handlers.
//!
//! Every route requires an authenticated admin; the domain enforces the role.
//!
//! ```text
//! GET  /api/v1/admin/dashboard
//! GET  /api/v1/admin/users
//! PUT  /api/v1/admin/users/{id}/role {"role":"PROFESSIONAL"}
//! POST /api/v1/admin/professionals/{id}/credits {"amount":50}
//! PUT  /api/v1/admin/orders/{id}/status {"status":"CLOSED"}
//! POST /api/v1/admin/orders/expire
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DashboardStats, Error, MAX_CREDIT_GRANT, OrderStatus, OrderView, Role, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, out_of_range_error, parse_order_id, parse_user_id,
};

const USER_ID: FieldName = FieldName::new("userId");
const PROFESSIONAL_ID: FieldName = FieldName::new("professionalId");
const ORDER_ID: FieldName = FieldName::new("orderId");
const ROLE: FieldName = FieldName::new("role");
const AMOUNT: FieldName = FieldName::new("amount");
const STATUS: FieldName = FieldName::new("status");

/// Body for `PUT /api/v1/admin/users/{id}/role`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RoleChangeRequest {
    /// `CLIENT`, `PROFESSIONAL` or `ADMIN`.
    pub role: String,
}

/// Body for `POST /api/v1/admin/professionals/{id}/credits`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreditGrantRequest {
    pub amount: i64,
}

/// New balance after a grant.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreditBalance {
    pub credits: u32,
}

/// Body for `PUT /api/v1/admin/orders/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderStatusRequest {
    /// `OPEN`, `CLOSED` or `EXPIRED`.
    pub status: String,
}

/// Number of orders moved to `EXPIRED`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ExpirySweep {
    pub expired: u64,
}

/// Marketplace totals.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardStats),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStats>> {
    let admin = session.require_user_id()?;
    Ok(web::Json(state.admin_query.dashboard(&admin).await?))
}

/// Every account.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Accounts", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let admin = session.require_user_id()?;
    Ok(web::Json(state.admin_query.users(&admin).await?))
}

/// Change a user's role.
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = String, Path, description = "User id")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 409, description = "Admins cannot demote themselves", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetRole"
)]
#[put("/admin/users/{id}/role")]
pub async fn set_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<web::Json<User>> {
    let admin = session.require_user_id()?;
    let target = parse_user_id(&path, USER_ID)?;
    let role = payload
        .role
        .parse::<Role>()
        .map_err(|err| invalid_value_error(ROLE, &payload.role, err))?;
    Ok(web::Json(state.admin.set_role(&admin, &target, role).await?))
}

/// Add credits to a professional's balance.
#[utoipa::path(
    post,
    path = "/api/v1/admin/professionals/{id}/credits",
    params(("id" = String, Path, description = "Professional user id")),
    request_body = CreditGrantRequest,
    responses(
        (status = 200, description = "New balance", body = CreditBalance),
        (status = 400, description = "Invalid amount", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown professional", body = Error),
        (status = 409, description = "Balance would overflow", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminGrantCredits"
)]
#[post("/admin/professionals/{id}/credits")]
pub async fn grant_credits(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreditGrantRequest>,
) -> ApiResult<web::Json<CreditBalance>> {
    let admin = session.require_user_id()?;
    let professional = parse_user_id(&path, PROFESSIONAL_ID)?;
    let amount = u32::try_from(payload.amount)
        .ok()
        .filter(|amount| (1..=MAX_CREDIT_GRANT).contains(amount))
        .ok_or_else(|| {
            out_of_range_error(
                AMOUNT,
                format!("amount must be between 1 and {MAX_CREDIT_GRANT}"),
            )
        })?;
    let balance = state
        .admin
        .grant_credits(&admin, &professional, amount)
        .await?;
    Ok(web::Json(CreditBalance {
        credits: balance.get(),
    }))
}

/// Force an order into a status.
#[utoipa::path(
    put,
    path = "/api/v1/admin/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown order", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetOrderStatus"
)]
#[put("/admin/orders/{id}/status")]
pub async fn set_order_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<OrderStatusRequest>,
) -> ApiResult<web::Json<OrderView>> {
    let admin = session.require_user_id()?;
    let order_id = parse_order_id(&path, ORDER_ID)?;
    let status = payload
        .status
        .parse::<OrderStatus>()
        .map_err(|err| invalid_value_error(STATUS, &payload.status, err))?;
    Ok(web::Json(
        state.admin.set_order_status(&admin, &order_id, status).await?,
    ))
}

/// Expire overdue orders immediately instead of waiting for the sweep.
#[utoipa::path(
    post,
    path = "/api/v1/admin/orders/expire",
    responses(
        (status = 200, description = "Sweep result", body = ExpirySweep),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminExpireOrders"
)]
#[post("/admin/orders/expire")]
pub async fn expire_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ExpirySweep>> {
    let admin = session.require_user_id()?;
    let expired = state.admin.expire_orders(&admin).await?;
    Ok(web::Json(ExpirySweep { expired }))
}
