//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL
//! via Diesel, with async support through `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Temporal rules live in the check-in engine.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: driver failures map onto each port's error
//!   enum with fixed, client-safe messages.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselCheckinRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/checkins")).await?;
//! let checkins = DieselCheckinRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_checkin_repository;
mod diesel_user_repository;
mod diesel_venue_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_checkin_repository::DieselCheckinRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_venue_repository::DieselVenueRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
