//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities of venue check-in tracking and
//! the services that enforce its temporal rules. Invariants and
//! serialisation contracts are documented on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Checkin: one user's presence at one venue.
//! - CheckinService: the check-in engine (state machine, cascade, sweep).
//! - VenueService / UserService: catalogue and profile use-cases.
//! - ports: driving and driven port traits for the hexagonal boundary.

pub mod checkin;
pub mod checkin_policy;
pub mod checkin_service;
pub mod error;
pub mod geo;
mod ids;
pub mod keyed_lock;
pub mod ports;
mod service_support;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod venue;
pub mod venue_service;

pub use self::checkin::{Checkin, CheckinId, CheckinRecord, CheckinStateError};
pub use self::checkin_policy::{
    CheckinPolicy, CheckinPolicyError, CooldownStatus, DEFAULT_COOLDOWN_MINUTES,
    DEFAULT_MAX_DWELL_MINUTES,
};
pub use self::checkin_service::CheckinService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::geo::{BoundingBox, GeoQueryError, MAX_QUERY_LATITUDE, MILES_PER_DEGREE, SearchRadius};
pub use self::keyed_lock::{KeyedGuard, KeyedLocks};
pub use self::trace_id::TraceId;
pub use self::user::{PasswordHash, User, UserDraft, UserId, UserProfile, UserValidationError};
pub use self::user_service::UserService;
pub use self::venue::{
    Coordinates, Venue, VenueDetails, VenueDraft, VenueId, VenueValidationError,
};
pub use self::venue_service::VenueService;
