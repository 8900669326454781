//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed marketplace entities used by the API and
//! persistence layers, together with the use-case services that drive them.
//! Keep types immutable where practical and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, ProfessionalProfile, OrderRequest, Review: core aggregates.
//! - documents: CPF/CNPJ validation and input masking.

pub mod address;
pub mod auth;
pub mod dashboard;
pub mod directory;
pub mod documents;
pub mod error;
pub mod order;
pub mod order_view;
pub mod order_wizard;
pub mod ports;
pub mod professional;
pub mod review;
pub mod trace_id;
pub mod user;

mod access;
mod account_service;
mod address_lookup_service;
mod admin_service;
mod directory_service;
mod lead_unlock_service;
mod order_service;

pub use self::account_service::AccountService;
pub use self::address::{
    Address, AddressParts, AddressSuggestion, AddressValidationError, PostalCode, RedactedAddress,
    RegionCode,
};
pub use self::address_lookup_service::AddressLookupService;
pub use self::admin_service::{AdminRepositories, AdminService, MAX_CREDIT_GRANT};
pub use self::auth::{AuthValidationError, LoginCredentials, Registration};
pub use self::dashboard::{DashboardStats, RoleCount, StatusCount};
pub use self::directory::{DirectoryEntry, DirectoryFilter, DirectoryFilterError, ProfessionalCard};
pub use self::directory_service::{DirectoryRepositories, DirectoryService};
pub use self::documents::{Document, DocumentError, DocumentKind};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::lead_unlock_service::LeadUnlockService;
pub use self::order::{
    DeadlineBucket, NewOrder, OrderId, OrderRequest, OrderStatus, UnknownVariant,
};
pub use self::order_service::{OrderRepositories, OrderService};
pub use self::order_view::{OrderView, Visibility};
pub use self::order_wizard::{FieldIssue, OrderDraft, OrderWizard, WizardStep};
pub use self::professional::{
    Credits, PhoneNumber, ProfessionalProfile, ProfileDetails, ProfileValidationError,
    RatingSummary, ServiceCategory,
};
pub use self::review::{Review, ReviewComment, ReviewValidationError, Stars};
pub use self::trace_id::TraceId;
pub use self::user::{
    AvatarUrl, DisplayName, EmailAddress, Role, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
