//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts with their login credentials.
    users (id) {
        id -> Uuid,
        /// Lowercased; unique.
        email -> Varchar,
        display_name -> Varchar,
        /// `CLIENT`, `PROFESSIONAL` or `ADMIN`.
        role -> Varchar,
        avatar_url -> Nullable<Text>,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per professional, keyed by the owning user.
    professional_profiles (user_id) {
        user_id -> Uuid,
        description -> Text,
        categories -> Array<Text>,
        region -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        credits -> Int4,
        completed_jobs -> Int4,
        /// Sum of all review stars.
        rating_total -> Int4,
        rating_count -> Int4,
    }
}

diesel::table! {
    order_requests (id) {
        id -> Uuid,
        client_id -> Uuid,
        category -> Varchar,
        description -> Text,
        postal_code -> Varchar,
        street -> Varchar,
        number -> Varchar,
        complement -> Nullable<Varchar>,
        neighborhood -> Varchar,
        city -> Varchar,
        region -> Varchar,
        contact_phone -> Varchar,
        deadline -> Varchar,
        status -> Varchar,
        /// Credits charged per unlock, fixed at publication.
        lead_price -> Int4,
        created_at -> Timestamptz,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Professionals who paid to see an order's contact details.
    order_unlocks (order_id, professional_id) {
        order_id -> Uuid,
        professional_id -> Uuid,
        price -> Int4,
        unlocked_at -> Timestamptz,
    }
}

diesel::table! {
    reviews (id) {
        id -> Uuid,
        professional_id -> Uuid,
        client_id -> Uuid,
        stars -> Int2,
        comment -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(professional_profiles -> users (user_id));
diesel::joinable!(order_requests -> users (client_id));
diesel::joinable!(order_unlocks -> order_requests (order_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    professional_profiles,
    order_requests,
    order_unlocks,
    reviews,
);
