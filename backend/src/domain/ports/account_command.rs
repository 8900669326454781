//! Driving port for account sign-up and self-service edits.

use async_trait::async_trait;

use crate::domain::{AvatarUrl, DisplayName, Error, Registration, User, UserId};

/// Changes a user may make to their own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub display_name: DisplayName,
    pub avatar: Option<AvatarUrl>,
}

#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; professionals also get an empty profile.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Apply `update` to the caller's own account.
    async fn update_account(&self, user_id: &UserId, update: AccountUpdate)
    -> Result<User, Error>;
}
