//! Port for venue persistence and spatial lookups.

use async_trait::async_trait;

use crate::domain::{BoundingBox, Venue, VenueId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by venue repository adapters.
    pub enum VenueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "venue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "venue repository query failed: {message}",
    }
}

/// Port for venue storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Find a venue by id.
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, VenueRepositoryError>;

    /// Every venue, ordered by name.
    async fn list_all(&self) -> Result<Vec<Venue>, VenueRepositoryError>;

    /// Insert or update a venue.
    async fn save(&self, venue: &Venue) -> Result<(), VenueRepositoryError>;

    /// Venues whose category equals `category` exactly.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Venue>, VenueRepositoryError>;

    /// Venues positioned inside `bounds`, edges included.
    async fn find_in_bounds(&self, bounds: &BoundingBox)
    -> Result<Vec<Venue>, VenueRepositoryError>;

    /// Venues whose name contains `fragment`, ignoring case.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Venue>, VenueRepositoryError>;

    /// Delete a venue. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &VenueId) -> Result<bool, VenueRepositoryError>;
}
