//! Driving port for clients reviewing professionals.

use async_trait::async_trait;

use crate::domain::{Error, ReviewComment, Stars, UserId};

use super::ReviewView;

#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Record one review by `client` for `professional`.
    async fn submit_review(
        &self,
        client: &UserId,
        professional: &UserId,
        stars: Stars,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error>;
}
