//! Builders wiring repositories into the services behind the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use backend::domain::ports::{CheckinRepository, CheckinSweep, UserRepository, VenueRepository};
use backend::domain::{CheckinPolicy, CheckinService, UserService, VenueService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::{
    InMemoryCheckinRepository, InMemoryUserRepository, InMemoryVenueRepository,
};
use backend::outbound::persistence::{
    DieselCheckinRepository, DieselUserRepository, DieselVenueRepository,
};

use super::ServerConfig;

/// Services shared by the HTTP workers and the background sweeper.
pub(crate) struct AppServices {
    pub http_state: HttpState,
    pub sweep: Arc<dyn CheckinSweep>,
    pub clock: Arc<dyn Clock>,
}

/// Wire one engine plus the venue and user services over a set of stores.
///
/// The engine is shared by the command, query, and sweep ports so every path
/// takes the same per-user locks.
fn wire_services<C, V, U>(
    checkins: Arc<C>,
    venues: Arc<V>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: CheckinPolicy,
) -> (HttpStatePorts, Arc<dyn CheckinSweep>)
where
    C: CheckinRepository + 'static,
    V: VenueRepository + 'static,
    U: UserRepository + 'static,
{
    let engine = Arc::new(
        CheckinService::new(
            checkins,
            Arc::clone(&venues),
            Arc::clone(&users),
            Arc::clone(&clock),
        )
        .with_policy(policy),
    );
    let venue_service = Arc::new(VenueService::new(venues, Arc::clone(&clock)));
    let user_service = Arc::new(UserService::new(users, clock));

    let ports = HttpStatePorts {
        checkins: engine.clone(),
        checkins_query: engine.clone(),
        venues: venue_service.clone(),
        venues_query: venue_service,
        profiles: user_service.clone(),
        registration: user_service,
    };
    (ports, engine)
}

/// Build the services using Diesel repositories when a pool is configured,
/// otherwise in-memory stores.
pub(crate) fn build_services(config: &ServerConfig) -> AppServices {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (ports, sweep) = match &config.db_pool {
        Some(pool) => wire_services(
            Arc::new(DieselCheckinRepository::new(pool.clone())),
            Arc::new(DieselVenueRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::clone(&clock),
            config.policy,
        ),
        None => wire_services(
            Arc::new(InMemoryCheckinRepository::new()),
            Arc::new(InMemoryVenueRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&clock),
            config.policy,
        ),
    };

    AppServices {
        http_state: HttpState::new(ports).with_error_status(config.error_status),
        sweep,
        clock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::inbound::http::ErrorStatusPolicy;
    use rstest::rstest;

    #[rstest]
    fn memory_services_carry_the_configured_status_policy() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("literal address"))
            .with_error_status(ErrorStatusPolicy::Unified);

        let services = build_services(&config);

        assert_eq!(services.http_state.error_status, ErrorStatusPolicy::Unified);
    }

    #[rstest]
    #[tokio::test]
    async fn memory_sweep_starts_with_nothing_to_close() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("literal address"));
        let services = build_services(&config);

        let outcome = services
            .sweep
            .sweep_expired(services.clock.utc())
            .await
            .expect("sweep over empty stores");

        assert_eq!(outcome.closed, 0);
        assert_eq!(outcome.candidates, 0);
    }
}
