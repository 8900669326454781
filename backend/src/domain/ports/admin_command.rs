//! Driving port for admin interventions.

use async_trait::async_trait;

use crate::domain::{Credits, Error, OrderId, OrderStatus, OrderView, Role, User, UserId};

#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Change a user's role. Admins cannot demote themselves.
    async fn set_role(&self, admin: &UserId, target: &UserId, role: Role) -> Result<User, Error>;

    /// Add credits to a professional and return the new balance.
    async fn grant_credits(
        &self,
        admin: &UserId,
        professional: &UserId,
        amount: u32,
    ) -> Result<Credits, Error>;

    /// Force an order into `status`.
    async fn set_order_status(
        &self,
        admin: &UserId,
        order: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderView, Error>;

    /// Expire overdue orders now and return how many changed.
    async fn expire_orders(&self, admin: &UserId) -> Result<u64, Error>;
}
