//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! domain payloads they exchange and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{OwnProfile, ProfessionalPage, ReviewView, UnlockReceipt};
use crate::domain::{
    Address, AddressSuggestion, Credits, DashboardStats, DeadlineBucket, DocumentKind, Error,
    ErrorCode, FieldIssue, OrderDraft, OrderStatus, OrderView, ProfessionalCard, RedactedAddress,
    RegionCode, Role, RoleCount, StatusCount, User, WizardStep,
};
use crate::inbound::http::admin::{
    CreditBalance, CreditGrantRequest, ExpirySweep, OrderStatusRequest, RoleChangeRequest,
};
use crate::inbound::http::documents::{DocumentCheck, DocumentRequest};
use crate::inbound::http::orders::{CloseOrderRequest, StepCheck, StepCheckRequest};
use crate::inbound::http::professionals::{ProfileRequest, ReviewRequest};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateAccountRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace API",
        description = "Order requests, credit-gated leads and the professional directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::documents::validate_document,
        crate::inbound::http::addresses::lookup_address,
        crate::inbound::http::professionals::search_professionals,
        crate::inbound::http::professionals::own_profile,
        crate::inbound::http::professionals::update_own_profile,
        crate::inbound::http::professionals::professional_profile,
        crate::inbound::http::professionals::submit_review,
        crate::inbound::http::orders::validate_step,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::my_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::close_order,
        crate::inbound::http::leads::list_leads,
        crate::inbound::http::leads::unlock_lead,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::set_role,
        crate::inbound::http::admin::grant_credits,
        crate::inbound::http::admin::set_order_status,
        crate::inbound::http::admin::expire_orders,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        Credits,
        RegionCode,
        Address,
        RedactedAddress,
        AddressSuggestion,
        DocumentKind,
        DocumentRequest,
        DocumentCheck,
        RegisterRequest,
        LoginRequest,
        UpdateAccountRequest,
        ProfessionalCard,
        ProfessionalPage,
        OwnProfile,
        ReviewView,
        ProfileRequest,
        ReviewRequest,
        OrderStatus,
        DeadlineBucket,
        OrderDraft,
        WizardStep,
        FieldIssue,
        StepCheckRequest,
        StepCheck,
        OrderView,
        CloseOrderRequest,
        UnlockReceipt,
        DashboardStats,
        RoleCount,
        StatusCount,
        RoleChangeRequest,
        CreditGrantRequest,
        CreditBalance,
        OrderStatusRequest,
        ExpirySweep,
    )),
    tags(
        (name = "users", description = "Registration, login and account self-service"),
        (name = "documents", description = "CPF and CNPJ validation"),
        (name = "addresses", description = "Postal-code (CEP) lookup"),
        (name = "professionals", description = "Directory, profiles and reviews"),
        (name = "orders", description = "Order wizard and client order management"),
        (name = "leads", description = "Lead browsing and credit-gated unlocks"),
        (name = "admin", description = "Dashboard and administrative interventions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
