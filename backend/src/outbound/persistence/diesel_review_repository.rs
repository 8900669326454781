//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{RatingSummary, Review, UserId};

use super::diesel_error_mapping::{DieselFailure, basic, classify, pool_error_message};
use super::models::ReviewRow;
use super::pool::{DbPool, PoolError};
use super::row_conversions::{review_to_row, row_to_review};
use super::schema::{professional_profiles, reviews};

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    ReviewPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> ReviewPersistenceError {
    basic(
        classify(error),
        ReviewPersistenceError::connection,
        ReviewPersistenceError::query,
    )
}

fn map_insert_error(error: DieselError, review: &Review) -> ReviewPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation(_) => ReviewPersistenceError::duplicate(
            review.client_id.to_string(),
            review.professional_id.to_string(),
        ),
        other => basic(
            other,
            ReviewPersistenceError::connection,
            ReviewPersistenceError::query,
        ),
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert_and_rerate(
        &self,
        review: &Review,
    ) -> Result<RatingSummary, ReviewPersistenceError> {
        let row = review_to_row(review);
        let professional = row.professional_id;
        let stars = i32::from(row.stars);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let totals = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let totals: Option<(i32, i32)> =
                        diesel::update(professional_profiles::table.find(professional))
                            .set((
                                professional_profiles::rating_total
                                    .eq(professional_profiles::rating_total + stars),
                                professional_profiles::rating_count
                                    .eq(professional_profiles::rating_count + 1),
                            ))
                            .returning((
                                professional_profiles::rating_total,
                                professional_profiles::rating_count,
                            ))
                            .get_result(conn)
                            .await
                            .optional()?;
                    if totals.is_some() {
                        diesel::insert_into(reviews::table)
                            .values(&row)
                            .execute(conn)
                            .await?;
                    }
                    Ok(totals)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_insert_error(err, review))?;

        let (total, count) = totals.ok_or_else(|| {
            ReviewPersistenceError::profile_not_found(review.professional_id.to_string())
        })?;
        match (u32::try_from(total), u32::try_from(count)) {
            (Ok(total), Ok(count)) => Ok(RatingSummary::new(total, count)),
            _ => Err(ReviewPersistenceError::query("negative rating totals")),
        }
    }

    async fn list_for_professional(
        &self,
        professional: &UserId,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::professional_id.eq(professional.as_uuid()))
            .order_by((reviews::created_at.desc(), reviews::id))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_review(row).map_err(ReviewPersistenceError::query))
            .collect()
    }
}
