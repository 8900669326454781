//! CPF/CNPJ check endpoint.
//!
//! ```text
//! POST /api/v1/documents/validate {"document":"529.982.247-25"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::documents::mask_document;
use crate::domain::{Document, DocumentKind, Error};
use crate::inbound::http::ApiResult;

/// Request body for `POST /api/v1/documents/validate`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Raw input, masked or bare.
    pub document: String,
}

/// Outcome of a document check.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCheck {
    /// Kind inferred from the digit count; absent when it matches neither.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    pub valid: bool,
    /// Input re-masked for display.
    pub masked: String,
}

impl DocumentCheck {
    fn of(raw: &str) -> Self {
        match Document::parse(raw) {
            Ok(document) => Self {
                kind: Some(document.kind()),
                valid: true,
                masked: document.masked(),
            },
            Err(_) => Self {
                kind: DocumentKind::detect(raw),
                valid: false,
                masked: mask_document(raw),
            },
        }
    }
}

/// Validate a CPF or CNPJ and return its masked form.
///
/// Invalid documents are not an error: the response says `valid: false`.
#[utoipa::path(
    post,
    path = "/api/v1/documents/validate",
    request_body = DocumentRequest,
    responses(
        (status = 200, description = "Check result", body = DocumentCheck),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["documents"],
    operation_id = "validateDocument",
    security([])
)]
#[post("/documents/validate")]
pub async fn validate_document(
    payload: web::Json<DocumentRequest>,
) -> ApiResult<web::Json<DocumentCheck>> {
    Ok(web::Json(DocumentCheck::of(&payload.document)))
}
