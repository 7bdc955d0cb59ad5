//! Driving port for venue mutations.

use async_trait::async_trait;

use crate::domain::{Error, Venue, VenueDraft, VenueId};

/// Use-cases that create, edit, and remove venues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueCommand: Send + Sync {
    /// Validate and store a new venue.
    async fn create_venue(&self, draft: VenueDraft) -> Result<Venue, Error>;

    /// Replace every editable attribute of an existing venue.
    async fn update_venue(&self, venue_id: VenueId, draft: VenueDraft) -> Result<Venue, Error>;

    /// Remove a venue.
    async fn delete_venue(&self, venue_id: VenueId) -> Result<(), Error>;
}
