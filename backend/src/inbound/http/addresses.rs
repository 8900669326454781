//! CEP autocompletion endpoint.
//!
//! ```text
//! GET /api/v1/addresses/01310-100
//! ```

use actix_web::{get, web};

use crate::domain::{AddressSuggestion, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Resolve a CEP into street, neighbourhood, city and state.
///
/// Upstream failures answer 503 so the wizard can fall back to manual entry.
#[utoipa::path(
    get,
    path = "/api/v1/addresses/{cep}",
    params(("cep" = String, Path, description = "Postal code, masked or bare")),
    responses(
        (status = 200, description = "Address suggestion", body = AddressSuggestion),
        (status = 400, description = "Malformed postal code", body = Error),
        (status = 404, description = "Unknown postal code", body = Error),
        (status = 503, description = "Lookup unavailable", body = Error)
    ),
    tags = ["addresses"],
    operation_id = "lookupAddress",
    security([])
)]
#[get("/addresses/{cep}")]
pub async fn lookup_address(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AddressSuggestion>> {
    Ok(web::Json(state.addresses.lookup(&path).await?))
}
