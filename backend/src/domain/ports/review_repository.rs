//! Port for professional reviews.
use async_trait::async_trait;

use crate::domain::{RatingSummary, Review, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The client already reviewed this professional.
        Duplicate { client: String, professional: String } =>
            "client {client} already reviewed professional {professional}",
        /// No profile for the reviewed professional.
        ProfileNotFound { id: String } => "professional profile {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert the review and fold its stars into the profile rating in one
    /// transaction; returns the updated summary.
    async fn insert_and_rerate(&self, review: &Review)
    -> Result<RatingSummary, ReviewPersistenceError>;

    /// Reviews of `professional`, newest first.
    async fn list_for_professional(
        &self,
        professional: &UserId,
    ) -> Result<Vec<Review>, ReviewPersistenceError>;
}
