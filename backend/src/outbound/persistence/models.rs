//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live in
//! `row_conversions.rs`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{order_requests, order_unlocks, professional_profiles, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub password_hash: String,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub avatar_url: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Changeset for the self-service account fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub display_name: &'a str,
    pub avatar_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Professional profiles
// ---------------------------------------------------------------------------

/// Row struct for the professional_profiles table, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = professional_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub description: String,
    pub categories: Vec<String>,
    pub region: Option<String>,
    pub phone: Option<String>,
    pub credits: i32,
    pub completed_jobs: i32,
    pub rating_total: i32,
    pub rating_count: i32,
}

/// Changeset replacing the editable profile details.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = professional_profiles)]
pub(crate) struct ProfileDetailsUpdate<'a> {
    pub description: &'a str,
    pub categories: Vec<&'a str>,
    pub region: &'a str,
    pub phone: &'a str,
}

// ---------------------------------------------------------------------------
// Orders and unlocks
// ---------------------------------------------------------------------------

/// Row struct for the order_requests table, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub category: String,
    pub description: String,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
    pub contact_phone: String,
    pub deadline: String,
    pub status: String,
    pub lead_price: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insertable struct recording one paid unlock.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_unlocks)]
pub(crate) struct NewUnlockRow {
    pub order_id: Uuid,
    pub professional_id: Uuid,
    pub price: i32,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Row struct for the reviews table, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub client_id: Uuid,
    pub stars: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
