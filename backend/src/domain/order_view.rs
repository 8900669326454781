//! What each viewer may see of an order.
//!
//! Owners, admins and professionals who unlocked the lead get the full street
//! address and contact phone. Everyone else sees the coarse area only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::address::{Address, RedactedAddress};
use super::order::{DeadlineBucket, OrderRequest, OrderStatus};
use super::professional::Credits;
use super::user::{Role, UserId};

/// Who is looking at an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Owner or admin.
    Full,
    /// Professional who paid for the lead.
    Unlocked,
    /// Professional browsing leads before paying.
    Redacted,
}

impl Visibility {
    /// Resolve what `viewer` with `role` may see of `order`, or `None` when
    /// the order must stay hidden from them.
    pub fn resolve(order: &OrderRequest, viewer: &UserId, role: Role) -> Option<Self> {
        if role == Role::Admin || &order.client_id == viewer {
            return Some(Self::Full);
        }
        match role {
            Role::Professional if order.is_unlocked_by(viewer) => Some(Self::Unlocked),
            Role::Professional if order.status == OrderStatus::Open => Some(Self::Redacted),
            _ => None,
        }
    }

    fn reveals_contact(self) -> bool {
        !matches!(self, Self::Redacted)
    }
}

/// Order as returned to a specific viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[schema(value_type = String)]
    pub id: String,
    pub category: String,
    pub description: String,
    pub deadline: DeadlineBucket,
    pub status: OrderStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
    #[schema(value_type = u32)]
    pub lead_price: Credits,
    pub unlock_count: usize,
    pub unlocked: bool,
    pub area: RedactedAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl OrderView {
    /// Project `order` for a viewer with the given visibility.
    pub fn project(order: &OrderRequest, visibility: Visibility) -> Self {
        let reveal = visibility.reveals_contact();
        Self {
            id: order.id.to_string(),
            category: order.category.to_string(),
            description: order.description.clone(),
            deadline: order.deadline,
            status: order.status,
            created_at: order.created_at,
            expires_at: order.expires_at(),
            lead_price: order.lead_price,
            unlock_count: order.unlocked_by.len(),
            unlocked: visibility == Visibility::Unlocked,
            area: order.address.redacted(),
            address: reveal.then(|| order.address.clone()),
            contact_phone: reveal.then(|| order.contact_phone.masked()),
        }
    }
}
