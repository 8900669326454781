//! Credit-gated lead unlock.
//!
//! A professional pays the order's lead price once to see its contact
//! details. The repository performs the balance check, the debit and the
//! unlock append in a single transaction; this service only authorises the
//! caller and translates outcomes into responses.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access::actor_with_role;
use crate::domain::ports::{
    LeadUnlockCommand, LeadUnlockError, LeadUnlockRepository, UnlockOutcome, UnlockReceipt,
    UserRepository,
};
use crate::domain::{Error, OrderId, OrderView, Role, UserId, Visibility};

fn map_unlock_error(error: LeadUnlockError) -> Error {
    match error {
        LeadUnlockError::Connection { message } => {
            Error::service_unavailable(format!("unlock repository unavailable: {message}"))
        }
        LeadUnlockError::Query { message } => {
            Error::internal(format!("unlock repository error: {message}"))
        }
        LeadUnlockError::OrderNotFound { id } => Error::not_found(format!("order {id} not found")),
        LeadUnlockError::OrderNotOpen { id } => {
            Error::conflict(format!("order {id} is no longer open"))
        }
        LeadUnlockError::ProfileNotFound { .. } => {
            Error::forbidden("a professional profile is required to unlock leads")
        }
    }
}

/// Service implementing [`LeadUnlockCommand`].
#[derive(Clone)]
pub struct LeadUnlockService<U, L> {
    users: Arc<U>,
    unlocks: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<U, L> LeadUnlockService<U, L> {
    /// Build the service; orders past their deadline on `clock` are refused.
    pub fn new(users: Arc<U>, unlocks: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            unlocks,
            clock,
        }
    }
}

#[async_trait]
impl<U, L> LeadUnlockCommand for LeadUnlockService<U, L>
where
    U: UserRepository,
    L: LeadUnlockRepository,
{
    async fn unlock(
        &self,
        professional: &UserId,
        order: &OrderId,
    ) -> Result<UnlockReceipt, Error> {
        actor_with_role(self.users.as_ref(), professional, Role::Professional).await?;
        let outcome = self
            .unlocks
            .unlock(order, professional, self.clock.utc())
            .await
            .map_err(map_unlock_error)?;
        match outcome {
            UnlockOutcome::Unlocked { order, remaining } => {
                info!(
                    order_id = %order.id,
                    professional_id = %professional,
                    price = order.lead_price.get(),
                    remaining = remaining.get(),
                    "lead unlocked"
                );
                Ok(UnlockReceipt {
                    order: OrderView::project(&order, Visibility::Unlocked),
                    remaining_credits: remaining,
                    charged: true,
                })
            }
            UnlockOutcome::AlreadyUnlocked { order, balance } => Ok(UnlockReceipt {
                order: OrderView::project(&order, Visibility::Unlocked),
                remaining_credits: balance,
                charged: false,
            }),
            UnlockOutcome::InsufficientCredits { balance, price } => {
                Err(Error::insufficient_credits(format!(
                    "unlocking this lead costs {price} credits but the balance is {balance}"
                ))
                .with_details(json!({ "balance": balance.get(), "price": price.get() })))
            }
        }
    }
}
