//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"ana@example.com","password":"...","displayName":"Ana","role":"CLIENT"}
//! POST /api/v1/login {"email":"ana@example.com","password":"..."}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! PUT /api/v1/users/me {"displayName":"Ana Souza","avatarUrl":null}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AccountUpdate;
use crate::domain::{
    AuthValidationError, AvatarUrl, DisplayName, Error, LoginCredentials, Registration, Role,
    User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, invalid_value_error};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const DISPLAY_NAME: FieldName = FieldName::new("displayName");
const ROLE: FieldName = FieldName::new("role");
const AVATAR_URL: FieldName = FieldName::new("avatarUrl");

/// Sign-up body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// `CLIENT` or `PROFESSIONAL`.
    pub role: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `PUT /api/v1/users/me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let field = match &err {
        AuthValidationError::EmptyEmail | AuthValidationError::InvalidEmail => EMAIL,
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordLength { .. } => {
            PASSWORD
        }
        AuthValidationError::DisplayName(_) => DISPLAY_NAME,
        AuthValidationError::RoleNotSelfServe => ROLE,
    };
    invalid_field_error(field, err)
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let role = value
            .role
            .parse::<Role>()
            .map_err(|err: UserValidationError| invalid_value_error(ROLE, &value.role, err))?;
        Self::try_from_parts(&value.email, &value.password, &value.display_name, role)
            .map_err(map_auth_validation_error)
    }
}

impl TryFrom<UpdateAccountRequest> for AccountUpdate {
    type Error = Error;

    fn try_from(value: UpdateAccountRequest) -> Result<Self, Self::Error> {
        let display_name =
            DisplayName::new(value.display_name).map_err(|err| invalid_field_error(DISPLAY_NAME, err))?;
        let avatar = value
            .avatar_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| AvatarUrl::new(raw).map_err(|err| invalid_value_error(AVATAR_URL, raw, err)))
            .transpose()?;
        Ok(Self {
            display_name,
            avatar,
        })
    }
}

/// Create a client or professional account and start a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "E-mail already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(&registration).await?;
    session.sign_in(user.id())?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_auth_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.sign_in(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.sign_out();
    HttpResponse::NoContent().finish()
}

/// Return the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let user = state.users.current_user(&user_id).await?;
    Ok(web::Json(user))
}

/// Rename the authenticated user or change their avatar.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[put("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateAccountRequest>,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let update = AccountUpdate::try_from(payload.into_inner())?;
    let user = state.accounts.update_account(&user_id, update).await?;
    Ok(web::Json(user))
}
