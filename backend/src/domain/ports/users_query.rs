//! Driving port for user-facing account reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Account of the authenticated user.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
