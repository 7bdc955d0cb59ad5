//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CheckinCommand, CheckinQuery, UserProfileQuery, UserRegistration, VenueCommand, VenueQuery,
};
use crate::inbound::http::ErrorStatusPolicy;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub checkins: Arc<dyn CheckinCommand>,
    pub checkins_query: Arc<dyn CheckinQuery>,
    pub venues: Arc<dyn VenueCommand>,
    pub venues_query: Arc<dyn VenueQuery>,
    pub profiles: Arc<dyn UserProfileQuery>,
    pub registration: Arc<dyn UserRegistration>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub checkins: Arc<dyn CheckinCommand>,
    pub checkins_query: Arc<dyn CheckinQuery>,
    pub venues: Arc<dyn VenueCommand>,
    pub venues_query: Arc<dyn VenueQuery>,
    pub profiles: Arc<dyn UserProfileQuery>,
    pub registration: Arc<dyn UserRegistration>,
    pub error_status: ErrorStatusPolicy,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle using the legacy status policy.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            checkins,
            checkins_query,
            venues,
            venues_query,
            profiles,
            registration,
        } = ports;
        Self {
            checkins,
            checkins_query,
            venues,
            venues_query,
            profiles,
            registration,
            error_status: ErrorStatusPolicy::default(),
        }
    }

    /// Select how check-in endpoint failures map to status codes.
    #[must_use]
    pub fn with_error_status(mut self, policy: ErrorStatusPolicy) -> Self {
        self.error_status = policy;
        self
    }
}
