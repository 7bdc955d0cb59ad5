//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod checkins;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod venues;

pub use error::{ApiResult, ErrorStatusPolicy};

/// Register every API handler on a service config.
///
/// Mount it under the `/api/v1` scope. The literal venue routes are
/// registered before `/venues/{id}` so they are not captured as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(checkins::check_in)
        .service(checkins::check_out)
        .service(checkins::delete_checkin)
        .service(checkins::active_by_venue)
        .service(checkins::history_by_user)
        .service(venues::nearby_venues)
        .service(venues::search_venues)
        .service(venues::venues_by_category)
        .service(venues::list_venues)
        .service(venues::create_venue)
        .service(venues::get_venue)
        .service(venues::update_venue)
        .service(venues::delete_venue)
        .service(users::register_user)
        .service(users::get_user);
}
