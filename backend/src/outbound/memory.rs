//! In-process store adapters.
//!
//! Used when no database URL is configured and by tests that exercise the
//! services end to end without PostgreSQL. Each store keeps its records in a
//! `Mutex<HashMap>`; no lock is held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CheckinRepository, CheckinRepositoryError, UserPersistenceError, UserRepository,
    VenueRepository, VenueRepositoryError,
};
use crate::domain::{BoundingBox, Checkin, CheckinId, User, UserId, Venue, VenueId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Check-in store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryCheckinRepository {
    rows: Mutex<HashMap<CheckinId, Checkin>>,
}

impl InMemoryCheckinRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record without going through the engine.
    pub fn insert(&self, checkin: Checkin) {
        lock(&self.rows).insert(checkin.id(), checkin);
    }

    /// Every stored record, in no particular order.
    pub fn snapshot(&self) -> Vec<Checkin> {
        lock(&self.rows).values().copied().collect()
    }

    fn select(&self, predicate: impl Fn(&Checkin) -> bool) -> Vec<Checkin> {
        let mut rows: Vec<Checkin> = lock(&self.rows)
            .values()
            .filter(|checkin| predicate(checkin))
            .copied()
            .collect();
        rows.sort_by(|a, b| b.checkin_time().cmp(&a.checkin_time()));
        rows
    }
}

#[async_trait]
impl CheckinRepository for InMemoryCheckinRepository {
    async fn find_by_id(&self, id: &CheckinId) -> Result<Option<Checkin>, CheckinRepositoryError> {
        Ok(lock(&self.rows).get(id).copied())
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        Ok(self.select(|c| c.user_id() == *user_id && c.is_active()))
    }

    async fn find_active_by_venue(
        &self,
        venue_id: &VenueId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        Ok(self.select(|c| c.venue_id() == *venue_id && c.is_active()))
    }

    async fn find_last_by_user_and_venue(
        &self,
        user_id: &UserId,
        venue_id: &VenueId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError> {
        Ok(lock(&self.rows)
            .values()
            .filter(|c| c.user_id() == *user_id && c.venue_id() == *venue_id)
            .max_by_key(|c| (c.checkin_time(), c.created_at()))
            .copied())
    }

    async fn find_history_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        Ok(self.select(|c| c.user_id() == *user_id))
    }

    async fn find_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        Ok(self.select(|c| c.is_active() && c.checkin_time() < cutoff))
    }

    async fn save(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError> {
        let mut rows = lock(&self.rows);
        let stored_checkout = rows.get(&checkin.id()).and_then(Checkin::checkout_time);
        if stored_checkout.is_some() && checkin.is_active() {
            return Err(CheckinRepositoryError::query(format!(
                "checkin {} is closed and cannot be reopened",
                checkin.id()
            )));
        }
        rows.insert(checkin.id(), *checkin);
        Ok(())
    }

    async fn delete(&self, id: &CheckinId) -> Result<bool, CheckinRepositoryError> {
        Ok(lock(&self.rows).remove(id).is_some())
    }
}

/// Venue store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryVenueRepository {
    rows: Mutex<HashMap<VenueId, Venue>>,
}

impl InMemoryVenueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, venue: Venue) {
        lock(&self.rows).insert(venue.id(), venue);
    }

    fn select(&self, predicate: impl Fn(&Venue) -> bool) -> Vec<Venue> {
        let mut rows: Vec<Venue> = lock(&self.rows)
            .values()
            .filter(|venue| predicate(venue))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        rows
    }
}

#[async_trait]
impl VenueRepository for InMemoryVenueRepository {
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, VenueRepositoryError> {
        Ok(lock(&self.rows).get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Venue>, VenueRepositoryError> {
        Ok(self.select(|_| true))
    }

    async fn save(&self, venue: &Venue) -> Result<(), VenueRepositoryError> {
        lock(&self.rows).insert(venue.id(), venue.clone());
        Ok(())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Venue>, VenueRepositoryError> {
        Ok(self.select(|venue| venue.details().category() == Some(category)))
    }

    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
    ) -> Result<Vec<Venue>, VenueRepositoryError> {
        Ok(self.select(|venue| {
            let position = venue.coordinates();
            bounds.contains(position.latitude(), position.longitude())
        }))
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Venue>, VenueRepositoryError> {
        let needle = fragment.to_lowercase();
        Ok(self.select(|venue| venue.name().to_lowercase().contains(&needle)))
    }

    async fn delete(&self, id: &VenueId) -> Result<bool, VenueRepositoryError> {
        Ok(lock(&self.rows).remove(id).is_some())
    }
}

/// User store backed by a hash map; enforces unique email and username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        lock(&self.rows).insert(user.id(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.rows).get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.rows)
            .values()
            .find(|user| user.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.rows)
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let clash = rows.values().filter(|other| other.id() != user.id()).find_map(|other| {
            if other.email().eq_ignore_ascii_case(user.email()) {
                Some("email")
            } else if other.username() == user.username() {
                Some("username")
            } else {
                None
            }
        });
        if let Some(field) = clash {
            return Err(UserPersistenceError::duplicate(field));
        }
        rows.insert(user.id(), user.clone());
        Ok(())
    }
}
