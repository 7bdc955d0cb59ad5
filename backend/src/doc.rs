//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every check-in, venue, user, and health endpoint
//! plus the wire schemas they exchange. Domain types stay free of utoipa
//! derives; [`ErrorSchema`] and [`ErrorCodeSchema`] stand in for them.
//!
//! The generated document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::checkins::{
    ActiveCheckinsResponseBody, CheckinRequestBody, CheckinResponseBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{RegisterUserBody, UserProfileBody};
use crate::inbound::http::venues::{VenueRequestBody, VenueResponseBody};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Venue check-in API",
        description = "Check in to venues, browse the venue catalogue, and read user profiles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::checkins::check_in,
        crate::inbound::http::checkins::check_out,
        crate::inbound::http::checkins::delete_checkin,
        crate::inbound::http::checkins::active_by_venue,
        crate::inbound::http::checkins::history_by_user,
        crate::inbound::http::venues::list_venues,
        crate::inbound::http::venues::get_venue,
        crate::inbound::http::venues::create_venue,
        crate::inbound::http::venues::update_venue,
        crate::inbound::http::venues::delete_venue,
        crate::inbound::http::venues::nearby_venues,
        crate::inbound::http::venues::venues_by_category,
        crate::inbound::http::venues::search_venues,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CheckinRequestBody,
        CheckinResponseBody,
        ActiveCheckinsResponseBody,
        VenueRequestBody,
        VenueResponseBody,
        RegisterUserBody,
        UserProfileBody,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "checkins", description = "Check in, check out, and presence history"),
        (name = "venues", description = "Venue catalogue and geographic search"),
        (name = "users", description = "User provisioning and profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
