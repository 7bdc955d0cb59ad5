//! Venue check-in tracking backend.
//!
//! Hexagonal layout: `domain` holds the check-in engine and its ports,
//! `inbound` the REST adapter and the expiry sweeper, `outbound` the
//! in-memory and PostgreSQL stores.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
