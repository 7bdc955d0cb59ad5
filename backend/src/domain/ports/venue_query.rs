//! Driving port for venue reads, including the proximity search.

use async_trait::async_trait;

use crate::domain::{Error, SearchRadius, Venue, VenueId};

/// Centre and radius of a proximity search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: SearchRadius,
}

/// Read-side use-cases over venues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueQuery: Send + Sync {
    /// Every venue.
    async fn list_venues(&self) -> Result<Vec<Venue>, Error>;

    /// A single venue, or `NotFound`.
    async fn get_venue(&self, venue_id: VenueId) -> Result<Venue, Error>;

    /// Venues in a category.
    async fn venues_in_category(&self, category: String) -> Result<Vec<Venue>, Error>;

    /// Venues whose name contains `query`, ignoring case.
    async fn search_venues(&self, query: String) -> Result<Vec<Venue>, Error>;

    /// Venues inside the rectangle enclosing the search circle.
    async fn nearby_venues(&self, query: NearbyQuery) -> Result<Vec<Venue>, Error>;
}
