//! Driving port for clients publishing and closing orders.

use async_trait::async_trait;

use crate::domain::{Error, NewOrder, OrderId, OrderView, UserId};

#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Publish a validated order at the configured lead price.
    async fn create_order(&self, client: &UserId, order: NewOrder) -> Result<OrderView, Error>;

    /// Close an open order owned by `client`, optionally crediting the hired
    /// professional with a completed job.
    async fn close_order(
        &self,
        client: &UserId,
        order: &OrderId,
        hired: Option<UserId>,
    ) -> Result<OrderView, Error>;
}
