//! Temporal rules governing check-ins.

use chrono::{DateTime, Duration, Utc};

/// Default wait after checkout before the same venue accepts the user again.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 20;
/// Default maximum stay before the sweep closes a check-in.
pub const DEFAULT_MAX_DWELL_MINUTES: i64 = 120;

/// Errors raised when building a [`CheckinPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckinPolicyError {
    #[error("cooldown must not be negative, got {minutes} minutes")]
    NegativeCooldown { minutes: i64 },
    #[error("maximum dwell must be positive, got {minutes} minutes")]
    NonPositiveMaxDwell { minutes: i64 },
}

/// Outcome of evaluating the cooldown for a previously closed check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    Elapsed,
    Remaining { minutes: i64 },
}

/// Cooldown and dwell limits applied by the check-in engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinPolicy {
    cooldown_minutes: i64,
    max_dwell: Duration,
}

impl Default for CheckinPolicy {
    fn default() -> Self {
        Self {
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            max_dwell: Duration::minutes(DEFAULT_MAX_DWELL_MINUTES),
        }
    }
}

impl CheckinPolicy {
    /// Build a policy from minute values.
    pub fn new(cooldown_minutes: i64, max_dwell_minutes: i64) -> Result<Self, CheckinPolicyError> {
        if cooldown_minutes < 0 {
            return Err(CheckinPolicyError::NegativeCooldown {
                minutes: cooldown_minutes,
            });
        }
        if max_dwell_minutes <= 0 {
            return Err(CheckinPolicyError::NonPositiveMaxDwell {
                minutes: max_dwell_minutes,
            });
        }
        Ok(Self {
            cooldown_minutes,
            max_dwell: Duration::minutes(max_dwell_minutes),
        })
    }

    pub fn cooldown_minutes(&self) -> i64 {
        self.cooldown_minutes
    }

    pub fn max_dwell(&self) -> Duration {
        self.max_dwell
    }

    /// Evaluate the cooldown for a check-in closed at `checkout_time`.
    ///
    /// Elapsed time is counted in whole minutes, truncated toward zero, so a
    /// gap of 19m59s counts as 19 minutes and leaves 1 minute remaining.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CheckinPolicy, CooldownStatus};
    /// use chrono::{Duration, Utc};
    ///
    /// let policy = CheckinPolicy::default();
    /// let checkout = Utc::now();
    /// assert_eq!(
    ///     policy.cooldown_status(checkout, checkout + Duration::minutes(15)),
    ///     CooldownStatus::Remaining { minutes: 5 },
    /// );
    /// assert_eq!(
    ///     policy.cooldown_status(checkout, checkout + Duration::minutes(20)),
    ///     CooldownStatus::Elapsed,
    /// );
    /// ```
    pub fn cooldown_status(
        &self,
        checkout_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> CooldownStatus {
        // A checkout stamped ahead of this clock counts as just now.
        let minutes_since = (now - checkout_time).num_minutes().max(0);
        if minutes_since < self.cooldown_minutes {
            CooldownStatus::Remaining {
                minutes: self.cooldown_minutes - minutes_since,
            }
        } else {
            CooldownStatus::Elapsed
        }
    }

    /// Check-ins that started strictly before this instant have overstayed.
    pub fn expiry_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.max_dwell
    }
}
