//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{NewAccount, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{Credits, EmailAddress, ProfessionalProfile, Role, User, UserId};

use super::diesel_error_mapping::{DieselFailure, basic, classify, pool_error_message};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::row_conversions::{profile_to_row, row_to_user};
use super::schema::{professional_profiles, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    basic(
        classify(error),
        UserPersistenceError::connection,
        UserPersistenceError::query,
    )
}

fn map_insert_error(error: DieselError, email: &EmailAddress) -> UserPersistenceError {
    match classify(error) {
        DieselFailure::UniqueViolation(_) => UserPersistenceError::duplicate_email(email.as_ref()),
        other => basic(
            other,
            UserPersistenceError::connection,
            UserPersistenceError::query,
        ),
    }
}

fn decode(row: &UserRow) -> Result<User, UserPersistenceError> {
    row_to_user(row).map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserPersistenceError> {
        let profile_row = account
            .profile
            .as_ref()
            .map(profile_to_row)
            .transpose()
            .map_err(UserPersistenceError::query)?;
        let user = &account.user;
        let new_user = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            display_name: user.display_name().as_ref(),
            role: user.role().as_str(),
            avatar_url: user.avatar().map(|avatar| avatar.as_ref()),
            password_hash: &account.password_hash,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)
                    .await?;
                if let Some(row) = &profile_row {
                    diesel::insert_into(professional_profiles::table)
                        .values(row)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_insert_error(err, user.email()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(decode).transpose()
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            Ok(StoredCredentials {
                user: decode(&row)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order_by((users::display_name, users::id))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.iter().map(decode).collect()
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            display_name: user.display_name().as_ref(),
            avatar_url: user.avatar().map(|avatar| avatar.as_ref()),
        };
        let updated = diesel::update(users::table.find(user.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::not_found(user.id().to_string()));
        }
        Ok(())
    }

    async fn set_role(
        &self,
        id: &UserId,
        role: Role,
        welcome_credits: Credits,
    ) -> Result<User, UserPersistenceError> {
        let welcome_row = profile_to_row(&ProfessionalProfile::empty(id.clone(), welcome_credits))
            .map_err(UserPersistenceError::query)?;
        let uuid = *id.as_uuid();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let updated: Option<UserRow> = diesel::update(users::table.find(uuid))
                        .set(users::role.eq(role.as_str()))
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                    if updated.is_some() && role == Role::Professional {
                        diesel::insert_into(professional_profiles::table)
                            .values(&welcome_row)
                            .on_conflict(professional_profiles::user_id)
                            .do_nothing()
                            .execute(conn)
                            .await?;
                    }
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        decode(&row)
    }
}
