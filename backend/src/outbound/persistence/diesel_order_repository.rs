//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Orders are stored in `order_requests`; the professionals who unlocked each
//! one live in `order_unlocks` and are reattached on every read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{OrderPersistenceError, OrderRepository};
use crate::domain::{OrderId, OrderRequest, OrderStatus, UserId};

use super::diesel_error_mapping::{basic, classify, pool_error_message};
use super::models::OrderRow;
use super::pool::{DbPool, PoolError};
use super::row_conversions::{order_to_row, row_to_order};
use super::schema::{order_requests, order_unlocks, professional_profiles};

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderPersistenceError {
    OrderPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> OrderPersistenceError {
    basic(
        classify(error),
        OrderPersistenceError::connection,
        OrderPersistenceError::query,
    )
}

/// Unlocking professionals per order, in unlock order.
pub(super) async fn load_unlocks(
    conn: &mut AsyncPgConnection,
    order_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, Vec<Uuid>>> {
    let pairs: Vec<(Uuid, Uuid)> = order_unlocks::table
        .filter(order_unlocks::order_id.eq_any(order_ids))
        .order_by((order_unlocks::unlocked_at, order_unlocks::professional_id))
        .select((order_unlocks::order_id, order_unlocks::professional_id))
        .load(conn)
        .await?;
    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (order_id, professional_id) in pairs {
        grouped.entry(order_id).or_default().push(professional_id);
    }
    Ok(grouped)
}

/// Load one order with its unlocks.
pub(super) async fn load_order(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> QueryResult<Option<(OrderRow, Vec<Uuid>)>> {
    let row: Option<OrderRow> = order_requests::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut unlocks = load_unlocks(conn, &[id]).await?;
    let unlocked_by = unlocks.remove(&id).unwrap_or_default();
    Ok(Some((row, unlocked_by)))
}

fn decode(row: OrderRow, unlocked_by: Vec<Uuid>) -> Result<OrderRequest, OrderPersistenceError> {
    row_to_order(row, unlocked_by).map_err(OrderPersistenceError::query)
}

async fn with_unlocks(
    conn: &mut AsyncPgConnection,
    rows: Vec<OrderRow>,
) -> Result<Vec<OrderRequest>, OrderPersistenceError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut unlocks = load_unlocks(conn, &ids).await.map_err(map_diesel_error)?;
    rows.into_iter()
        .map(|row| {
            let unlocked_by = unlocks.remove(&row.id).unwrap_or_default();
            decode(row, unlocked_by)
        })
        .collect()
}

/// Decision reached inside the `close` transaction.
enum Closing {
    Closed(OrderRow, Vec<Uuid>),
    Missing,
    NotOpen,
    HiredWithoutUnlock,
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &OrderRequest) -> Result<(), OrderPersistenceError> {
        let row = order_to_row(order).map_err(OrderPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(order_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: &OrderId) -> Result<Option<OrderRequest>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = load_order(&mut conn, *id.as_uuid())
            .await
            .map_err(map_diesel_error)?;
        found
            .map(|(row, unlocked_by)| decode(row, unlocked_by))
            .transpose()
    }

    async fn list_by_client(
        &self,
        client: &UserId,
    ) -> Result<Vec<OrderRequest>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = order_requests::table
            .filter(order_requests::client_id.eq(client.as_uuid()))
            .order_by((order_requests::created_at.desc(), order_requests::id))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_unlocks(&mut conn, rows).await
    }

    async fn list_open(&self) -> Result<Vec<OrderRequest>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = order_requests::table
            .filter(order_requests::status.eq(OrderStatus::Open.as_str()))
            .order_by((order_requests::created_at.desc(), order_requests::id))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        with_unlocks(&mut conn, rows).await
    }

    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRequest, OrderPersistenceError> {
        let uuid = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(order_requests::table.find(uuid))
            .set(order_requests::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(OrderPersistenceError::not_found(id.to_string()));
        }
        let (row, unlocked_by) = load_order(&mut conn, uuid)
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| OrderPersistenceError::not_found(id.to_string()))?;
        decode(row, unlocked_by)
    }

    async fn close(
        &self,
        id: &OrderId,
        hired: Option<UserId>,
    ) -> Result<OrderRequest, OrderPersistenceError> {
        let uuid = *id.as_uuid();
        let hired_uuid = hired.as_ref().map(|professional| *professional.as_uuid());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let closing = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let status: Option<String> = order_requests::table
                        .find(uuid)
                        .select(order_requests::status)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(status) = status else {
                        return Ok(Closing::Missing);
                    };
                    if status != OrderStatus::Open.as_str() {
                        return Ok(Closing::NotOpen);
                    }
                    if let Some(professional) = hired_uuid {
                        let unlocked: bool = diesel::select(diesel::dsl::exists(
                            order_unlocks::table
                                .filter(order_unlocks::order_id.eq(uuid))
                                .filter(order_unlocks::professional_id.eq(professional)),
                        ))
                        .get_result(conn)
                        .await?;
                        if !unlocked {
                            return Ok(Closing::HiredWithoutUnlock);
                        }
                        diesel::update(professional_profiles::table.find(professional))
                            .set(
                                professional_profiles::completed_jobs
                                    .eq(professional_profiles::completed_jobs + 1),
                            )
                            .execute(conn)
                            .await?;
                    }
                    diesel::update(order_requests::table.find(uuid))
                        .set(order_requests::status.eq(OrderStatus::Closed.as_str()))
                        .execute(conn)
                        .await?;
                    match load_order(conn, uuid).await? {
                        Some((row, unlocked_by)) => Ok(Closing::Closed(row, unlocked_by)),
                        None => Ok(Closing::Missing),
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match closing {
            Closing::Closed(row, unlocked_by) => decode(row, unlocked_by),
            Closing::Missing => Err(OrderPersistenceError::not_found(id.to_string())),
            Closing::NotOpen => Err(OrderPersistenceError::not_open(id.to_string())),
            Closing::HiredWithoutUnlock => Err(OrderPersistenceError::hired_without_unlock(
                id.to_string(),
                hired.map(|professional| professional.to_string()).unwrap_or_default(),
            )),
        }
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let expired = diesel::update(
            order_requests::table
                .filter(order_requests::status.eq(OrderStatus::Open.as_str()))
                .filter(order_requests::expires_at.le(now)),
        )
        .set(order_requests::status.eq(OrderStatus::Expired.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(expired as u64)
    }

    async fn has_engaged(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<bool, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            order_unlocks::table
                .inner_join(order_requests::table)
                .filter(order_requests::client_id.eq(client.as_uuid()))
                .filter(order_unlocks::professional_id.eq(professional.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
