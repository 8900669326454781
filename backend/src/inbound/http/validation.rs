//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field produces an `invalid_request` error whose details
//! carry `{ field, code, value? }` so clients can highlight the input.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, OrderId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Reject a field whose content failed a domain rule; `reason` is the
/// domain error's message.
pub(crate) fn invalid_field_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    ValidationError::new(field.as_str(), reason.to_string()).with_code(ErrorCode::InvalidValue)
}

/// Like [`invalid_field_error`] but echoes the rejected value back.
pub(crate) fn invalid_value_error(
    field: FieldName,
    value: &str,
    reason: impl std::fmt::Display,
) -> Error {
    ValidationError::new(field.as_str(), reason.to_string())
        .with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn out_of_range_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    ValidationError::new(field.as_str(), reason.to_string()).with_code(ErrorCode::OutOfRange)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_order_id(value: &str, field: FieldName) -> Result<OrderId, Error> {
    parse_uuid(value, field).map(OrderId::from_uuid)
}
