//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::Clock;

use crate::domain::{CheckinService, UserId, UserService, VenueId, VenueService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryCheckinRepository, InMemoryUserRepository, InMemoryVenueRepository,
};
use crate::test_support::MutableClock;
use crate::test_support::fixtures::{t0, user_named, venue_at};

/// Memory-backed services with one user and two venues seeded.
pub struct MemoryWorld {
    pub state: HttpState,
    pub clock: Arc<MutableClock>,
    pub checkins: Arc<InMemoryCheckinRepository>,
    pub alice: UserId,
    /// "The Tipsy Crow", in Greenwich Village.
    pub crow: VenueId,
    /// "Neon Room", a block away from the Crow.
    pub neon: VenueId,
}

/// Seed in-memory stores and wire the real services over them.
pub fn memory_world() -> MemoryWorld {
    let checkins = Arc::new(InMemoryCheckinRepository::new());
    let venues = Arc::new(InMemoryVenueRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(MutableClock::new(t0()));
    let dyn_clock: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;

    let alice = user_named("alice");
    let crow = venue_at("The Tipsy Crow", 40.7306, -74.0007);
    let neon = venue_at("Neon Room", 40.7316, -74.0012);
    let ids = (alice.id(), crow.id(), neon.id());
    users.insert(alice);
    venues.insert(crow);
    venues.insert(neon);

    let engine = Arc::new(CheckinService::new(
        Arc::clone(&checkins),
        Arc::clone(&venues),
        Arc::clone(&users),
        Arc::clone(&dyn_clock),
    ));
    let venue_service = Arc::new(VenueService::new(venues, Arc::clone(&dyn_clock)));
    let user_service = Arc::new(UserService::new(users, dyn_clock));

    let state = HttpState::new(HttpStatePorts {
        checkins: engine.clone(),
        checkins_query: engine,
        venues: venue_service.clone(),
        venues_query: venue_service,
        profiles: user_service.clone(),
        registration: user_service,
    });

    MemoryWorld {
        state,
        clock,
        checkins,
        alice: ids.0,
        crow: ids.1,
        neon: ids.2,
    }
}

/// Build an app serving the full API under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(crate::inbound::http::configure))
}
