//! Actix middleware shared by every route.
//!
//! [`Trace`] stamps each request with a correlation id used by logs, error
//! bodies and the `trace-id` response header.

pub mod trace;

pub use trace::Trace;
