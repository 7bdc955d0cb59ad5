//! Port for check-in persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Checkin, CheckinId, UserId, VenueId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by check-in repository adapters.
    pub enum CheckinRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "checkin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "checkin repository query failed: {message}",
    }
}

/// Port for reading and writing check-ins.
///
/// Adapters must never clear a stored `checkout_time`: saving an active copy
/// of a check-in that is already closed in storage leaves it closed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// Find a check-in by id.
    async fn find_by_id(&self, id: &CheckinId) -> Result<Option<Checkin>, CheckinRepositoryError>;

    /// Active check-ins of a user at any venue.
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError>;

    /// Active check-ins at a venue.
    async fn find_active_by_venue(
        &self,
        venue_id: &VenueId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError>;

    /// Most recent check-in (by check-in time) of a user at a venue.
    async fn find_last_by_user_and_venue(
        &self,
        user_id: &UserId,
        venue_id: &VenueId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError>;

    /// Every check-in of a user, newest check-in time first.
    async fn find_history_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError>;

    /// Active check-ins whose check-in time is strictly before `cutoff`.
    async fn find_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError>;

    /// Insert or update a check-in.
    async fn save(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError>;

    /// Delete a check-in. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &CheckinId) -> Result<bool, CheckinRepositoryError>;
}
