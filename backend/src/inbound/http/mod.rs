//! HTTP inbound adapter exposing REST endpoints.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};

use crate::domain::Error;

pub mod addresses;
pub mod admin;
pub mod documents;
pub mod error;
pub mod health;
pub mod leads;
pub mod orders;
pub mod professionals;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

fn malformed_body(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed request body: {err}")).into()
}

fn malformed_query(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed query string: {err}")).into()
}

/// Register every `/api/v1` handler.
///
/// Literal segments such as `/professionals/me` are registered before the
/// `{id}` routes they would otherwise be captured by.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(malformed_body))
        .app_data(web::QueryConfig::default().error_handler(malformed_query))
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(documents::validate_document)
        .service(addresses::lookup_address)
        .service(professionals::search_professionals)
        .service(professionals::own_profile)
        .service(professionals::update_own_profile)
        .service(professionals::professional_profile)
        .service(professionals::submit_review)
        .service(orders::validate_step)
        .service(orders::my_orders)
        .service(orders::create_order)
        .service(orders::get_order)
        .service(orders::close_order)
        .service(leads::list_leads)
        .service(leads::unlock_lead)
        .service(admin::dashboard)
        .service(admin::list_users)
        .service(admin::set_role)
        .service(admin::grant_credits)
        .service(admin::set_order_status)
        .service(admin::expire_orders);
}
