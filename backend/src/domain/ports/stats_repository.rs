//! Port for admin dashboard aggregates.
use async_trait::async_trait;

use crate::domain::DashboardStats;

use super::define_port_error;

define_port_error! {
    /// Errors raised by stats adapters.
    pub enum StatsError {
        /// Repository connection could not be established.
        Connection { message: String } => "stats repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "stats repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Compute marketplace-wide totals.
    async fn dashboard(&self) -> Result<DashboardStats, StatsError>;
}
