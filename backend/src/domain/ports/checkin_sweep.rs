//! Driving port for closing overstayed check-ins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Error;

/// Summary of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepOutcome {
    /// Check-ins returned by the expiry query.
    pub candidates: usize,
    /// Check-ins closed by this pass.
    pub closed: usize,
}

/// Closes check-ins that exceeded the maximum dwell time.
///
/// Implementations are idempotent: a second pass at the same instant closes
/// nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckinSweep: Send + Sync {
    /// Close every active check-in that started before `now - max_dwell`,
    /// stamping `now` as the checkout time.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<SweepOutcome, Error>;
}
