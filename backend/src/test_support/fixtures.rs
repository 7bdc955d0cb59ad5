//! Builders for domain records used across test suites.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    PasswordHash, User, UserDraft, UserId, Venue, VenueDetails, VenueDraft, VenueId,
};

/// Fixed instant used as `t0` by scenario tests: 2026-03-06 20:00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 6, 20, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("fixture instant is valid"),
    }
}

/// A valid user named `username`, with a stored password hash.
pub fn user_named(username: &str) -> User {
    let draft = UserDraft {
        id: UserId::random(),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        password_hash: Some(PasswordHash::new("$2a$10$fixture-hash-never-serialised")),
        created_at: t0(),
        updated_at: t0(),
    };
    match User::new(draft) {
        Ok(user) => user,
        Err(error) => panic!("fixture user is valid: {error}"),
    }
}

/// Venue attributes at the given position.
pub fn venue_draft(name: &str, latitude: f64, longitude: f64) -> VenueDraft {
    VenueDraft {
        name: name.to_owned(),
        address: Some("1 Fixture Street".to_owned()),
        latitude,
        longitude,
        category: Some("bar".to_owned()),
        ..VenueDraft::default()
    }
}

/// A stored venue at the given position.
pub fn venue_at(name: &str, latitude: f64, longitude: f64) -> Venue {
    let details = match VenueDetails::try_from(venue_draft(name, latitude, longitude)) {
        Ok(details) => details,
        Err(error) => panic!("fixture venue is valid: {error}"),
    };
    Venue::create(VenueId::random(), details, t0())
}

/// A stored venue in Manhattan.
pub fn venue_named(name: &str) -> Venue {
    venue_at(name, 40.7306, -74.0007)
}
