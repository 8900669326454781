//! Port for order request persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{OrderId, OrderRequest, OrderStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// No order with this id.
        NotFound { id: String } => "order {id} not found",
        /// The order is no longer open.
        NotOpen { id: String } => "order {id} is not open",
        /// The hired professional never unlocked the order.
        HiredWithoutUnlock { id: String, professional: String } =>
            "professional {professional} has not unlocked order {id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order.
    async fn insert(&self, order: &OrderRequest) -> Result<(), OrderPersistenceError>;

    /// Fetch an order with its unlock list.
    async fn find(&self, id: &OrderId) -> Result<Option<OrderRequest>, OrderPersistenceError>;

    /// Orders published by `client`, newest first.
    async fn list_by_client(
        &self,
        client: &UserId,
    ) -> Result<Vec<OrderRequest>, OrderPersistenceError>;

    /// Every open order, newest first.
    async fn list_open(&self) -> Result<Vec<OrderRequest>, OrderPersistenceError>;

    /// Overwrite the status.
    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRequest, OrderPersistenceError>;

    /// Close an open order. When `hired` is given, that professional must
    /// have unlocked it and their completed-job count grows by one in the
    /// same transaction.
    async fn close(
        &self,
        id: &OrderId,
        hired: Option<UserId>,
    ) -> Result<OrderRequest, OrderPersistenceError>;

    /// Mark open orders whose deadline passed at `now` as expired and return
    /// how many changed.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, OrderPersistenceError>;

    /// Whether `professional` unlocked any order published by `client`.
    async fn has_engaged(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<bool, OrderPersistenceError>;
}
