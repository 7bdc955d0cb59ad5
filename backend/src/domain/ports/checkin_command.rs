//! Driving port for check-in mutations.

use async_trait::async_trait;

use crate::domain::{Checkin, CheckinId, Error, UserId, VenueId};

/// Request to check a user in at a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInRequest {
    pub user_id: UserId,
    pub venue_id: VenueId,
}

/// Use-cases that change check-in state.
///
/// Failures use these codes:
/// - `NotFound` for unknown users, venues, or check-ins.
/// - `Conflict` for state-machine refusals (already checked in, cooldown
///   active, already checked out).
/// - `ServiceUnavailable` / `InternalError` for storage failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinCommand: Send + Sync {
    /// Check the user in, closing any other active check-ins they hold.
    async fn check_in(&self, request: CheckInRequest) -> Result<Checkin, Error>;

    /// Close an active check-in.
    async fn check_out(&self, checkin_id: CheckinId) -> Result<Checkin, Error>;

    /// Remove a check-in record outright.
    async fn delete_checkin(&self, checkin_id: CheckinId) -> Result<(), Error>;
}
