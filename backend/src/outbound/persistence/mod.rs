//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types; business rules stay in the domain services.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) never leave this
//!   module.
//! - Multi-step writes (account creation, unlocks, closing, reviews) run in a
//!   single transaction.
//!
//! The schema is created by the SQL files under `backend/migrations`, applied
//! with the Diesel CLI before the server starts.
//!
//! # Example
//!
//! ```ignore
//! use marketplace::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_lead_unlock_repository;
mod diesel_order_repository;
mod diesel_professional_repository;
mod diesel_review_repository;
mod diesel_stats_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod row_conversions;
mod schema;

pub use diesel_lead_unlock_repository::DieselLeadUnlockRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_professional_repository::DieselProfessionalRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_stats_repository::DieselStatsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
