//! Port for the credit-gated lead unlock.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Credits, OrderId, OrderRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lead unlock adapters.
    pub enum LeadUnlockError {
        /// Repository connection could not be established.
        Connection { message: String } => "unlock repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "unlock repository query failed: {message}",
        /// No order with this id.
        OrderNotFound { id: String } => "order {id} not found",
        /// Only open orders that are not yet overdue can be unlocked.
        OrderNotOpen { id: String } => "order {id} is not open",
        /// The caller has no professional profile.
        ProfileNotFound { id: String } => "professional profile {id} not found",
    }
}

/// Result of an unlock attempt that reached a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum UnlockOutcome {
    /// Credits were charged and the professional was appended.
    Unlocked {
        order: OrderRequest,
        remaining: Credits,
    },
    /// The professional had already paid; nothing was charged.
    AlreadyUnlocked { order: OrderRequest, balance: Credits },
    /// The balance does not cover the price; nothing was written.
    InsufficientCredits { balance: Credits, price: Credits },
}

/// Adapters must run the whole check-charge-append sequence in one
/// transaction so concurrent calls never overspend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadUnlockRepository: Send + Sync {
    /// Charge `professional` the order's lead price and record the unlock.
    ///
    /// An order past its deadline at `now` is refused as not open.
    async fn unlock(
        &self,
        order: &OrderId,
        professional: &UserId,
        now: DateTime<Utc>,
    ) -> Result<UnlockOutcome, LeadUnlockError>;
}
