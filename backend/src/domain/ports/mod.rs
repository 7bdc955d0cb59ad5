//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Command`, `*Query`, `CheckinSweep`, `UserRegistration`) are
//! implemented by domain services and called from inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod checkin_command;
mod checkin_query;
mod checkin_repository;
mod checkin_sweep;
mod user_profile_query;
mod user_repository;
mod venue_command;
mod venue_query;
mod venue_repository;

pub use checkin_command::{CheckInRequest, CheckinCommand};
#[cfg(test)]
pub use checkin_command::MockCheckinCommand;
pub use checkin_query::{CheckinQuery, CheckinView};
#[cfg(test)]
pub use checkin_query::MockCheckinQuery;
pub use checkin_repository::{CheckinRepository, CheckinRepositoryError};
#[cfg(test)]
pub use checkin_repository::MockCheckinRepository;
pub use checkin_sweep::{CheckinSweep, SweepOutcome};
#[cfg(test)]
pub use checkin_sweep::MockCheckinSweep;
pub use user_profile_query::{RegisterUserRequest, UserProfileQuery, UserRegistration};
#[cfg(test)]
pub use user_profile_query::{MockUserProfileQuery, MockUserRegistration};
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use venue_command::VenueCommand;
#[cfg(test)]
pub use venue_command::MockVenueCommand;
pub use venue_query::{NearbyQuery, VenueQuery};
#[cfg(test)]
pub use venue_query::MockVenueQuery;
pub use venue_repository::{VenueRepository, VenueRepositoryError};
#[cfg(test)]
pub use venue_repository::MockVenueRepository;
