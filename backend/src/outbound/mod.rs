//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store implementing the same ports, used
//!   when no database is configured and by tests
//! - **postal**: ViaCEP postal-code lookup over HTTP
//! - **argon2_hasher**: password hashing for stored credentials
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod argon2_hasher;
pub mod memory;
pub mod persistence;
pub mod postal;
