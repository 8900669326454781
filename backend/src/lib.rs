//! Services marketplace backend library.
//!
//! Clients describe jobs through a step-by-step order wizard, professionals
//! spend credits to unlock the contact details of matching orders, and a
//! public directory lists professionals with their review ratings.
//!
//! - [`domain`]: value objects, aggregates, ports and use-case services.
//! - [`inbound`]: the HTTP adapter.
//! - [`outbound`]: PostgreSQL, in-memory, postal lookup and hashing adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
