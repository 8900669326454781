//! PostgreSQL-backed `StatsRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{StatsError, StatsRepository};
use crate::domain::{DashboardStats, OrderStatus, Role};

use super::diesel_error_mapping::{basic, classify, pool_error_message};
use super::pool::{DbPool, PoolError};
use super::schema::{order_requests, order_unlocks, professional_profiles, users};

/// Diesel-backed implementation of the `StatsRepository` port.
#[derive(Clone)]
pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StatsError {
    StatsError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> StatsError {
    basic(classify(error), StatsError::connection, StatsError::query)
}

fn non_negative(value: i64, what: &str) -> Result<u64, StatsError> {
    u64::try_from(value).map_err(|_| StatsError::query(format!("negative {what}: {value}")))
}

/// Raw aggregates read in one snapshot.
struct Totals {
    roles: Vec<(String, i64)>,
    statuses: Vec<(String, i64)>,
    unlocks: i64,
    held: Option<i64>,
    spent: Option<i64>,
}

#[async_trait]
impl StatsRepository for DieselStatsRepository {
    async fn dashboard(&self) -> Result<DashboardStats, StatsError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let totals = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let roles: Vec<(String, i64)> = users::table
                        .group_by(users::role)
                        .select((users::role, count_star()))
                        .load(conn)
                        .await?;
                    let statuses: Vec<(String, i64)> = order_requests::table
                        .group_by(order_requests::status)
                        .select((order_requests::status, count_star()))
                        .load(conn)
                        .await?;
                    let unlocks: i64 = order_unlocks::table.count().get_result(conn).await?;
                    let held: Option<i64> = professional_profiles::table
                        .select(sum(professional_profiles::credits))
                        .get_result(conn)
                        .await?;
                    let spent: Option<i64> = order_unlocks::table
                        .select(sum(order_unlocks::price))
                        .get_result(conn)
                        .await?;
                    Ok(Totals {
                        roles,
                        statuses,
                        unlocks,
                        held,
                        spent,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let roles = totals
            .roles
            .into_iter()
            .map(|(role, count)| {
                let role = role
                    .parse::<Role>()
                    .map_err(|err| StatsError::query(err.to_string()))?;
                Ok((role, non_negative(count, "user count")?))
            })
            .collect::<Result<Vec<_>, StatsError>>()?;
        let statuses = totals
            .statuses
            .into_iter()
            .map(|(status, count)| {
                let status = status
                    .parse::<OrderStatus>()
                    .map_err(|err| StatsError::query(err.to_string()))?;
                Ok((status, non_negative(count, "order count")?))
            })
            .collect::<Result<Vec<_>, StatsError>>()?;

        Ok(DashboardStats::assemble(
            roles,
            statuses,
            non_negative(totals.unlocks, "unlock count")?,
            non_negative(totals.held.unwrap_or(0), "credits held")?,
            non_negative(totals.spent.unwrap_or(0), "credits spent")?,
        ))
    }
}
