//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{checkins, users, venues};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a user row already exists.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the venues table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VenueRow {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub age_restriction: Option<i32>,
    pub cover_charge: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for venue records; doubles as the upsert changeset.
///
/// `None` fields are written as `NULL` rather than skipped, since an update
/// replaces every attribute.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = venues)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VenueWriteRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub website: Option<&'a str>,
    pub age_restriction: Option<i32>,
    pub cover_charge: Option<&'a str>,
    pub description: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the checkins table.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = checkins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CheckinRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for check-in records.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = checkins)]
pub(crate) struct NewCheckinRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
