//! PostgreSQL-backed `ProfessionalRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{ProfessionalPersistenceError, ProfessionalRepository};
use crate::domain::{Credits, DirectoryEntry, ProfessionalProfile, ProfileDetails, Role, UserId};

use super::diesel_error_mapping::{basic, classify, pool_error_message};
use super::models::{ProfileDetailsUpdate, ProfileRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_conversions::{row_to_profile, row_to_user, to_db_amount};
use super::schema::{professional_profiles, users};

/// Diesel-backed implementation of the `ProfessionalRepository` port.
#[derive(Clone)]
pub struct DieselProfessionalRepository {
    pool: DbPool,
}

impl DieselProfessionalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfessionalPersistenceError {
    ProfessionalPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> ProfessionalPersistenceError {
    basic(
        classify(error),
        ProfessionalPersistenceError::connection,
        ProfessionalPersistenceError::query,
    )
}

fn decode_profile(row: ProfileRow) -> Result<ProfessionalProfile, ProfessionalPersistenceError> {
    row_to_profile(row).map_err(ProfessionalPersistenceError::query)
}

fn decode_entry(
    (user, profile): (UserRow, ProfileRow),
) -> Result<DirectoryEntry, ProfessionalPersistenceError> {
    Ok(DirectoryEntry {
        user: row_to_user(&user).map_err(ProfessionalPersistenceError::query)?,
        profile: decode_profile(profile)?,
    })
}

/// Outcome of the locked balance update inside `grant_credits`.
enum Grant {
    Applied(Credits),
    Missing,
    Overflow,
}

#[async_trait]
impl ProfessionalRepository for DieselProfessionalRepository {
    async fn find(
        &self,
        id: &UserId,
    ) -> Result<Option<ProfessionalProfile>, ProfessionalPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = professional_profiles::table
            .find(id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode_profile).transpose()
    }

    async fn find_entry(
        &self,
        id: &UserId,
    ) -> Result<Option<DirectoryEntry>, ProfessionalPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(UserRow, ProfileRow)> = professional_profiles::table
            .inner_join(users::table)
            .filter(users::id.eq(id.as_uuid()))
            .filter(users::role.eq(Role::Professional.as_str()))
            .select((UserRow::as_select(), ProfileRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode_entry).transpose()
    }

    async fn list_entries(&self) -> Result<Vec<DirectoryEntry>, ProfessionalPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(UserRow, ProfileRow)> = professional_profiles::table
            .inner_join(users::table)
            .filter(users::role.eq(Role::Professional.as_str()))
            .select((UserRow::as_select(), ProfileRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode_entry).collect()
    }

    async fn save_details(
        &self,
        id: &UserId,
        details: &ProfileDetails,
    ) -> Result<ProfessionalProfile, ProfessionalPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ProfileDetailsUpdate {
            description: &details.description,
            categories: details.categories.iter().map(AsRef::as_ref).collect(),
            region: details.region.code(),
            phone: details.phone.digits(),
        };
        let row: Option<ProfileRow> = diesel::update(professional_profiles::table.find(id.as_uuid()))
            .set(&changes)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let row = row.ok_or_else(|| ProfessionalPersistenceError::not_found(id.to_string()))?;
        decode_profile(row)
    }

    async fn grant_credits(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<Credits, ProfessionalPersistenceError> {
        let uuid = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let grant = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let current: Option<i32> = professional_profiles::table
                        .find(uuid)
                        .select(professional_profiles::credits)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(current) = current else {
                        return Ok(Grant::Missing);
                    };
                    let next = u32::try_from(current)
                        .ok()
                        .and_then(|balance| Credits::new(balance).checked_add(amount))
                        .and_then(|balance| {
                            to_db_amount(balance.get(), "credits")
                                .ok()
                                .map(|stored| (balance, stored))
                        });
                    let Some((balance, stored)) = next else {
                        return Ok(Grant::Overflow);
                    };
                    diesel::update(professional_profiles::table.find(uuid))
                        .set(professional_profiles::credits.eq(stored))
                        .execute(conn)
                        .await?;
                    Ok(Grant::Applied(balance))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match grant {
            Grant::Applied(balance) => {
                debug!(professional = %id, granted = %amount, %balance, "credit balance updated");
                Ok(balance)
            }
            Grant::Missing => Err(ProfessionalPersistenceError::not_found(id.to_string())),
            Grant::Overflow => Err(ProfessionalPersistenceError::credit_overflow(id.to_string())),
        }
    }
}
