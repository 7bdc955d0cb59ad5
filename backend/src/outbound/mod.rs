//! Outbound adapters implementing the repository ports.
//!
//! - **memory**: in-process stores used by tests and database-less runs
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;
