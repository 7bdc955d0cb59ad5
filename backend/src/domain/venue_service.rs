//! Venue catalogue service.
//!
//! Implements the venue driving ports over a [`VenueRepository`]: CRUD,
//! category and name lookups, and the rectangular proximity search.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{NearbyQuery, VenueCommand, VenueQuery, VenueRepository};
use crate::domain::service_support::map_venue_repository_error;
use crate::domain::{
    BoundingBox, Error, GeoQueryError, Venue, VenueDetails, VenueDraft, VenueId,
    VenueValidationError,
};

fn venue_not_found(venue_id: VenueId) -> Error {
    Error::not_found(format!("venue {venue_id} not found")).with_details(json!({
        "code": "venue_not_found",
        "venueId": venue_id,
    }))
}

fn invalid_venue(error: VenueValidationError) -> Error {
    let field = match error {
        VenueValidationError::EmptyName => "name",
        VenueValidationError::LatitudeOutOfRange { .. } => "latitude",
        VenueValidationError::LongitudeOutOfRange { .. } => "longitude",
        VenueValidationError::NegativeAgeRestriction { .. } => "ageRestriction",
        VenueValidationError::TimestampsOutOfOrder => "updatedAt",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_venue",
    }))
}

fn invalid_geo_query(error: GeoQueryError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_geo_query",
    }))
}

/// Venue service backed by a venue repository.
pub struct VenueService<R> {
    venues: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> VenueService<R> {
    pub fn new(venues: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { venues, clock }
    }
}

impl<R: VenueRepository> VenueService<R> {
    async fn require_venue(&self, venue_id: VenueId) -> Result<Venue, Error> {
        self.venues
            .find_by_id(&venue_id)
            .await
            .map_err(map_venue_repository_error)?
            .ok_or_else(|| venue_not_found(venue_id))
    }
}

#[async_trait]
impl<R: VenueRepository> VenueCommand for VenueService<R> {
    async fn create_venue(&self, draft: VenueDraft) -> Result<Venue, Error> {
        let details = VenueDetails::try_from(draft).map_err(invalid_venue)?;
        let venue = Venue::create(VenueId::random(), details, self.clock.utc());
        self.venues
            .save(&venue)
            .await
            .map_err(map_venue_repository_error)?;
        info!(venue_id = %venue.id(), name = venue.name(), "venue created");
        Ok(venue)
    }

    async fn update_venue(&self, venue_id: VenueId, draft: VenueDraft) -> Result<Venue, Error> {
        let details = VenueDetails::try_from(draft).map_err(invalid_venue)?;
        let mut venue = self.require_venue(venue_id).await?;
        venue.replace_details(details, self.clock.utc());
        self.venues
            .save(&venue)
            .await
            .map_err(map_venue_repository_error)?;
        info!(venue_id = %venue_id, "venue updated");
        Ok(venue)
    }

    async fn delete_venue(&self, venue_id: VenueId) -> Result<(), Error> {
        let deleted = self
            .venues
            .delete(&venue_id)
            .await
            .map_err(map_venue_repository_error)?;
        if !deleted {
            return Err(venue_not_found(venue_id));
        }
        info!(venue_id = %venue_id, "venue deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: VenueRepository> VenueQuery for VenueService<R> {
    async fn list_venues(&self) -> Result<Vec<Venue>, Error> {
        self.venues
            .list_all()
            .await
            .map_err(map_venue_repository_error)
    }

    async fn get_venue(&self, venue_id: VenueId) -> Result<Venue, Error> {
        self.require_venue(venue_id).await
    }

    async fn venues_in_category(&self, category: String) -> Result<Vec<Venue>, Error> {
        self.venues
            .find_by_category(&category)
            .await
            .map_err(map_venue_repository_error)
    }

    async fn search_venues(&self, query: String) -> Result<Vec<Venue>, Error> {
        let fragment = query.trim();
        if fragment.is_empty() {
            return Err(
                Error::invalid_request("search query must not be empty").with_details(json!({
                    "field": "query",
                    "code": "missing_field",
                })),
            );
        }
        self.venues
            .search_by_name(fragment)
            .await
            .map_err(map_venue_repository_error)
    }

    async fn nearby_venues(&self, query: NearbyQuery) -> Result<Vec<Venue>, Error> {
        let bounds = BoundingBox::around(query.latitude, query.longitude, query.radius)
            .map_err(invalid_geo_query)?;
        self.venues
            .find_in_bounds(&bounds)
            .await
            .map_err(map_venue_repository_error)
    }
}
