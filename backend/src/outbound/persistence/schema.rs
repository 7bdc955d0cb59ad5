//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `email` is unique ignoring case, `username` exactly.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Credential hash; never read back into API responses.
        password_hash -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Venues users can check in to.
    venues (id) {
        id -> Uuid,
        name -> Varchar,
        address -> Nullable<Varchar>,
        latitude -> Float8,
        longitude -> Float8,
        category -> Nullable<Varchar>,
        phone_number -> Nullable<Varchar>,
        website -> Nullable<Varchar>,
        age_restriction -> Nullable<Int4>,
        cover_charge -> Nullable<Varchar>,
        description -> Nullable<Text>,
        photo_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Presence records. A row is active while `checkout_time` is null.
    ///
    /// Rows are removed with their user or venue (`ON DELETE CASCADE`).
    checkins (id) {
        id -> Uuid,
        user_id -> Uuid,
        venue_id -> Uuid,
        checkin_time -> Timestamptz,
        checkout_time -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(checkins -> users (user_id));
diesel::joinable!(checkins -> venues (venue_id));

diesel::allow_tables_to_appear_in_same_query!(checkins, users, venues);
