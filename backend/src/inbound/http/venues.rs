//! Venue catalogue HTTP handlers.
//!
//! ```text
//! GET    /api/v1/venues
//! POST   /api/v1/venues
//! GET    /api/v1/venues/nearby?lat=..&lon=..&radiusMi=..
//! GET    /api/v1/venues/search?query=..
//! GET    /api/v1/venues/category/{category}
//! GET    /api/v1/venues/{id}
//! PUT    /api/v1/venues/{id}
//! DELETE /api/v1/venues/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::NearbyQuery;
use crate::domain::{Error, SearchRadius, Venue, VenueDraft, VenueId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_id, require, require_number,
};

const VENUE_ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const LATITUDE: FieldName = FieldName::new("latitude");
const LONGITUDE: FieldName = FieldName::new("longitude");
const LAT: FieldName = FieldName::new("lat");
const LON: FieldName = FieldName::new("lon");
const RADIUS: FieldName = FieldName::new("radiusMi");

/// Venue attributes accepted on create and update.
///
/// Update replaces every attribute, so omitted optional fields are cleared.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueRequestBody {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub age_restriction: Option<i32>,
    pub cover_charge: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

impl TryFrom<VenueRequestBody> for VenueDraft {
    type Error = Error;

    fn try_from(body: VenueRequestBody) -> Result<Self, Self::Error> {
        let VenueRequestBody {
            name,
            address,
            latitude,
            longitude,
            category,
            phone_number,
            website,
            age_restriction,
            cover_charge,
            description,
            photo_url,
        } = body;
        Ok(VenueDraft {
            name: require(name, NAME)?,
            address,
            latitude: latitude.ok_or_else(|| missing_field_error(LATITUDE))?,
            longitude: longitude.ok_or_else(|| missing_field_error(LONGITUDE))?,
            category,
            phone_number,
            website,
            age_restriction,
            cover_charge,
            description,
            photo_url,
        })
    }
}

/// Venue as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
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
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<&Venue> for VenueResponseBody {
    fn from(venue: &Venue) -> Self {
        let details = venue.details();
        let coordinates = details.coordinates();
        Self {
            id: venue.id().to_string(),
            name: details.name().to_owned(),
            address: details.address().map(str::to_owned),
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            category: details.category().map(str::to_owned),
            phone_number: details.phone_number().map(str::to_owned),
            website: details.website().map(str::to_owned),
            age_restriction: details.age_restriction(),
            cover_charge: details.cover_charge().map(str::to_owned),
            description: details.description().map(str::to_owned),
            photo_url: details.photo_url().map(str::to_owned),
            created_at: venue.created_at().to_rfc3339(),
            updated_at: venue.updated_at().to_rfc3339(),
        }
    }
}

fn to_bodies(venues: &[Venue]) -> Vec<VenueResponseBody> {
    venues.iter().map(VenueResponseBody::from).collect()
}

/// Query string for the proximity search.
///
/// Values arrive as raw strings so parse failures surface as JSON `400`
/// responses naming the offending parameter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyParams {
    /// Latitude of the search centre, in degrees.
    #[param(value_type = f64)]
    pub lat: Option<String>,
    /// Longitude of the search centre, in degrees.
    #[param(value_type = f64)]
    pub lon: Option<String>,
    /// Half-width of the search box, in miles.
    #[param(value_type = f64)]
    pub radius_mi: Option<String>,
}

/// Query string for the name search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive fragment of the venue name.
    pub query: Option<String>,
}

/// List every venue.
#[utoipa::path(
    get,
    path = "/api/v1/venues",
    responses(
        (status = 200, description = "All venues", body = [VenueResponseBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "listVenues"
)]
#[get("/venues")]
pub async fn list_venues(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<VenueResponseBody>>> {
    let venues = state.venues_query.list_venues().await?;
    Ok(web::Json(to_bodies(&venues)))
}

/// Fetch one venue.
#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}",
    params(("id" = String, Path, format = "uuid", description = "Venue identifier")),
    responses(
        (status = 200, description = "Venue", body = VenueResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "getVenue"
)]
#[get("/venues/{id}")]
pub async fn get_venue(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VenueResponseBody>> {
    let venue_id: VenueId = parse_id(path.into_inner(), VENUE_ID)?;
    let venue = state.venues_query.get_venue(venue_id).await?;
    Ok(web::Json(VenueResponseBody::from(&venue)))
}

/// Create a venue.
#[utoipa::path(
    post,
    path = "/api/v1/venues",
    request_body = VenueRequestBody,
    responses(
        (status = 201, description = "Venue created", body = VenueResponseBody),
        (status = 400, description = "Invalid venue attributes", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "createVenue"
)]
#[post("/venues")]
pub async fn create_venue(
    state: web::Data<HttpState>,
    payload: web::Json<VenueRequestBody>,
) -> ApiResult<HttpResponse> {
    let draft = VenueDraft::try_from(payload.into_inner())?;
    let venue = state.venues.create_venue(draft).await?;
    Ok(HttpResponse::Created().json(VenueResponseBody::from(&venue)))
}

/// Replace a venue's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/venues/{id}",
    params(("id" = String, Path, format = "uuid", description = "Venue identifier")),
    request_body = VenueRequestBody,
    responses(
        (status = 200, description = "Venue updated", body = VenueResponseBody),
        (status = 400, description = "Invalid venue attributes", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "updateVenue"
)]
#[put("/venues/{id}")]
pub async fn update_venue(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<VenueRequestBody>,
) -> ApiResult<web::Json<VenueResponseBody>> {
    let venue_id: VenueId = parse_id(path.into_inner(), VENUE_ID)?;
    let draft = VenueDraft::try_from(payload.into_inner())?;
    let venue = state.venues.update_venue(venue_id, draft).await?;
    Ok(web::Json(VenueResponseBody::from(&venue)))
}

/// Delete a venue and, with it, its check-in history.
#[utoipa::path(
    delete,
    path = "/api/v1/venues/{id}",
    params(("id" = String, Path, format = "uuid", description = "Venue identifier")),
    responses(
        (status = 204, description = "Venue deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "deleteVenue"
)]
#[delete("/venues/{id}")]
pub async fn delete_venue(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let venue_id: VenueId = parse_id(path.into_inner(), VENUE_ID)?;
    state.venues.delete_venue(venue_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Venues inside the square of half-width `radiusMi` around a point.
#[utoipa::path(
    get,
    path = "/api/v1/venues/nearby",
    params(NearbyParams),
    responses(
        (status = 200, description = "Venues in the search box", body = [VenueResponseBody]),
        (status = 400, description = "Missing or invalid coordinates or radius", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "nearbyVenues"
)]
#[get("/venues/nearby")]
pub async fn nearby_venues(
    state: web::Data<HttpState>,
    params: web::Query<NearbyParams>,
) -> ApiResult<web::Json<Vec<VenueResponseBody>>> {
    let NearbyParams { lat, lon, radius_mi } = params.into_inner();
    let latitude = require_number(lat, LAT)?;
    let longitude = require_number(lon, LON)?;
    let radius = SearchRadius::new(require_number(radius_mi, RADIUS)?).map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": "invalid_geo_query",
        }))
    })?;
    let query = NearbyQuery {
        latitude,
        longitude,
        radius,
    };
    let venues = state.venues_query.nearby_venues(query).await?;
    Ok(web::Json(to_bodies(&venues)))
}

/// Venues in a category (exact match).
#[utoipa::path(
    get,
    path = "/api/v1/venues/category/{category}",
    params(("category" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Venues in the category", body = [VenueResponseBody])
    ),
    tags = ["venues"],
    operation_id = "venuesByCategory"
)]
#[get("/venues/category/{category}")]
pub async fn venues_by_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<VenueResponseBody>>> {
    let venues = state
        .venues_query
        .venues_in_category(path.into_inner())
        .await?;
    Ok(web::Json(to_bodies(&venues)))
}

/// Venues whose name contains the query, ignoring case.
#[utoipa::path(
    get,
    path = "/api/v1/venues/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching venues", body = [VenueResponseBody]),
        (status = 400, description = "Blank query", body = ErrorSchema)
    ),
    tags = ["venues"],
    operation_id = "searchVenues"
)]
#[get("/venues/search")]
pub async fn search_venues(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<VenueResponseBody>>> {
    let query = params.into_inner().query.unwrap_or_default();
    let venues = state.venues_query.search_venues(query).await?;
    Ok(web::Json(to_bodies(&venues)))
}

#[cfg(test)]
#[path = "venues_tests.rs"]
mod tests;
