//! Driving port for buying a lead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Credits, Error, OrderId, OrderView, UserId};

/// Outcome returned to the professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlockReceipt {
    pub order: OrderView,
    #[schema(value_type = u32)]
    pub remaining_credits: Credits,
    /// `false` when the lead had already been unlocked and nothing was
    /// charged.
    pub charged: bool,
}

#[async_trait]
pub trait LeadUnlockCommand: Send + Sync {
    /// Spend the lead price to reveal the order's contact details.
    async fn unlock(&self, professional: &UserId, order: &OrderId)
    -> Result<UnlockReceipt, Error>;
}
