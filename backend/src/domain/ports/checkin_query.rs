//! Driving port for check-in reads.

use async_trait::async_trait;

use crate::domain::{Checkin, Error, UserId, VenueId};

/// A check-in joined with display names of its user and venue.
///
/// Names are `None` when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinView {
    pub checkin: Checkin,
    pub username: Option<String>,
    pub venue_name: Option<String>,
}

/// Read-side use-cases over check-ins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinQuery: Send + Sync {
    /// Active check-ins at a venue.
    async fn active_for_venue(&self, venue_id: VenueId) -> Result<Vec<Checkin>, Error>;

    /// All check-ins of a user, newest first.
    async fn history_for_user(&self, user_id: UserId) -> Result<Vec<Checkin>, Error>;

    /// Join check-ins with their user and venue names, preserving order.
    async fn describe(&self, checkins: Vec<Checkin>) -> Result<Vec<CheckinView>, Error>;
}
