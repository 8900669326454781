//! Driving port for admin dashboard reads.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error, User, UserId};

#[async_trait]
pub trait AdminQuery: Send + Sync {
    /// Marketplace totals.
    async fn dashboard(&self, admin: &UserId) -> Result<DashboardStats, Error>;

    /// Every account.
    async fn users(&self, admin: &UserId) -> Result<Vec<User>, Error>;
}
