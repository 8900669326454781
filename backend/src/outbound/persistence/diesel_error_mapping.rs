//! Shared Diesel error classification for the repository adapters.
//!
//! Each adapter turns a [`DieselFailure`] into its own port error, adding
//! context (ids, e-mail) that only it knows.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(&'static str),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// Anything else.
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(super) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub(super) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Fold a classified failure into a port error, treating unique violations
/// as generic query failures.
pub(super) fn basic<E>(
    failure: DieselFailure,
    connection: impl FnOnce(&'static str) -> E,
    query: impl FnOnce(&'static str) -> E,
) -> E {
    match failure {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::UniqueViolation(_) => query("unique constraint violated"),
        DieselFailure::Query(message) => query(message),
    }
}
