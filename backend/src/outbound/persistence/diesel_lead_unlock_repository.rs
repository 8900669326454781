//! PostgreSQL-backed `LeadUnlockRepository` implementation using Diesel ORM.
//!
//! The whole unlock runs in one transaction that locks the order row and
//! then the professional's profile row (`SELECT ... FOR UPDATE`, always in
//! that order). Concurrent unlocks by the same professional therefore queue
//! on the profile lock and each one sees the balance left by the previous.
//! An order past its stored `expires_at` is refused as not open even while
//! its status still reads `OPEN`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{LeadUnlockError, LeadUnlockRepository, UnlockOutcome};
use crate::domain::{Credits, OrderId, OrderRequest, OrderStatus, UserId};

use super::diesel_error_mapping::{basic, classify, pool_error_message};
use super::diesel_order_repository::load_order;
use super::models::{NewUnlockRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::row_conversions::row_to_order;
use super::schema::{order_requests, order_unlocks, professional_profiles};

/// Diesel-backed implementation of the `LeadUnlockRepository` port.
#[derive(Clone)]
pub struct DieselLeadUnlockRepository {
    pool: DbPool,
}

impl DieselLeadUnlockRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LeadUnlockError {
    LeadUnlockError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> LeadUnlockError {
    basic(
        classify(error),
        LeadUnlockError::connection,
        LeadUnlockError::query,
    )
}

/// Decision reached inside the unlock transaction, before decoding.
enum Decision {
    Unlocked { order: (OrderRow, Vec<Uuid>), remaining: u32 },
    AlreadyUnlocked { order: (OrderRow, Vec<Uuid>), balance: u32 },
    Insufficient { balance: u32, price: u32 },
    OrderMissing,
    OrderNotOpen,
    ProfileMissing,
    Corrupt(&'static str),
}

fn decode(order: (OrderRow, Vec<Uuid>)) -> Result<OrderRequest, LeadUnlockError> {
    let (row, unlocked_by) = order;
    row_to_order(row, unlocked_by).map_err(LeadUnlockError::query)
}

#[async_trait]
impl LeadUnlockRepository for DieselLeadUnlockRepository {
    async fn unlock(
        &self,
        order: &OrderId,
        professional: &UserId,
        now: DateTime<Utc>,
    ) -> Result<UnlockOutcome, LeadUnlockError> {
        let order_uuid = *order.as_uuid();
        let professional_uuid = *professional.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let decision = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let locked: Option<(String, i32, DateTime<Utc>)> = order_requests::table
                        .find(order_uuid)
                        .select((
                            order_requests::status,
                            order_requests::lead_price,
                            order_requests::expires_at,
                        ))
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some((status, price, expires_at)) = locked else {
                        return Ok(Decision::OrderMissing);
                    };
                    let balance: Option<i32> = professional_profiles::table
                        .find(professional_uuid)
                        .select(professional_profiles::credits)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(balance) = balance else {
                        return Ok(Decision::ProfileMissing);
                    };
                    let (Ok(balance), Ok(price)) = (u32::try_from(balance), u32::try_from(price))
                    else {
                        return Ok(Decision::Corrupt("negative balance or lead price"));
                    };

                    let already: bool = diesel::select(diesel::dsl::exists(
                        order_unlocks::table
                            .filter(order_unlocks::order_id.eq(order_uuid))
                            .filter(order_unlocks::professional_id.eq(professional_uuid)),
                    ))
                    .get_result(conn)
                    .await?;
                    if already {
                        return Ok(match load_order(conn, order_uuid).await? {
                            Some(order) => Decision::AlreadyUnlocked { order, balance },
                            None => Decision::OrderMissing,
                        });
                    }
                    if status != OrderStatus::Open.as_str() || now >= expires_at {
                        return Ok(Decision::OrderNotOpen);
                    }
                    let Some(remaining) = balance.checked_sub(price) else {
                        return Ok(Decision::Insufficient { balance, price });
                    };
                    let Ok(stored_remaining) = i32::try_from(remaining) else {
                        return Ok(Decision::Corrupt("balance exceeds the column range"));
                    };
                    let Ok(stored_price) = i32::try_from(price) else {
                        return Ok(Decision::Corrupt("lead price exceeds the column range"));
                    };

                    diesel::update(professional_profiles::table.find(professional_uuid))
                        .set(professional_profiles::credits.eq(stored_remaining))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(order_unlocks::table)
                        .values(&NewUnlockRow {
                            order_id: order_uuid,
                            professional_id: professional_uuid,
                            price: stored_price,
                        })
                        .execute(conn)
                        .await?;
                    Ok(match load_order(conn, order_uuid).await? {
                        Some(order) => Decision::Unlocked { order, remaining },
                        None => Decision::OrderMissing,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(%order, %professional, "unlock transaction finished");
        match decision {
            Decision::Unlocked { order, remaining } => Ok(UnlockOutcome::Unlocked {
                order: decode(order)?,
                remaining: Credits::new(remaining),
            }),
            Decision::AlreadyUnlocked { order, balance } => Ok(UnlockOutcome::AlreadyUnlocked {
                order: decode(order)?,
                balance: Credits::new(balance),
            }),
            Decision::Insufficient { balance, price } => Ok(UnlockOutcome::InsufficientCredits {
                balance: Credits::new(balance),
                price: Credits::new(price),
            }),
            Decision::OrderMissing => Err(LeadUnlockError::order_not_found(order.to_string())),
            Decision::OrderNotOpen => Err(LeadUnlockError::order_not_open(order.to_string())),
            Decision::ProfileMissing => {
                Err(LeadUnlockError::profile_not_found(professional.to_string()))
            }
            Decision::Corrupt(message) => Err(LeadUnlockError::query(message)),
        }
    }
}
