//! Driving port for reading orders and browsing leads.

use async_trait::async_trait;

use crate::domain::{Error, OrderId, OrderView, RegionCode, ServiceCategory, UserId};

/// Lead search criteria. When both are absent the professional's own
/// categories and region apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub category: Option<ServiceCategory>,
    pub region: Option<RegionCode>,
}

#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Orders published by the caller, newest first.
    async fn my_orders(&self, client: &UserId) -> Result<Vec<OrderView>, Error>;

    /// One order, projected for the caller.
    async fn order(&self, viewer: &UserId, order: &OrderId) -> Result<OrderView, Error>;

    /// Open orders a professional may buy, newest first.
    async fn leads(&self, professional: &UserId, filter: LeadFilter)
    -> Result<Vec<OrderView>, Error>;
}
