//! Inbound adapters that translate external triggers into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; the timer-driven expiry sweep lives in
//! [`sweeper`].

pub mod http;
pub mod sweeper;
