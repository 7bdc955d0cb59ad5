//! Check-in aggregate: one user's presence at one venue.
//!
//! A check-in is active while `checkout_time` is `None`. Closing it is the
//! only permitted mutation and it is one-way: a closed check-in can never be
//! reopened.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::define_entity_id;
use super::{UserId, VenueId};

define_entity_id! {
    /// Stable check-in identifier stored as a UUID.
    CheckinId
}

/// Lifecycle violations raised by [`Checkin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinStateError {
    /// The check-in already has a checkout time.
    AlreadyClosed { checkout_time: DateTime<Utc> },
    /// The requested checkout time precedes the check-in time.
    CheckoutBeforeCheckin {
        checkin_time: DateTime<Utc>,
        checkout_time: DateTime<Utc>,
    },
    /// `updated_at` precedes `created_at` in stored data.
    TimestampsOutOfOrder,
}

impl fmt::Display for CheckinStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyClosed { checkout_time } => {
                write!(f, "check-in was already closed at {checkout_time}")
            }
            Self::CheckoutBeforeCheckin {
                checkin_time,
                checkout_time,
            } => write!(
                f,
                "checkout time {checkout_time} precedes check-in time {checkin_time}"
            ),
            Self::TimestampsOutOfOrder => write!(f, "updated_at must not precede created_at"),
        }
    }
}

impl std::error::Error for CheckinStateError {}

/// Field values for rebuilding a stored check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinRecord {
    pub id: CheckinId,
    pub user_id: UserId,
    pub venue_id: VenueId,
    pub checkin_time: DateTime<Utc>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's presence at a venue.
///
/// ## Invariants
/// - `checkin_time <= checkout_time` when closed.
/// - `created_at <= updated_at`.
/// - Identity, user, venue, and check-in time never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkin {
    id: CheckinId,
    user_id: UserId,
    venue_id: VenueId,
    checkin_time: DateTime<Utc>,
    checkout_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Checkin {
    /// Open a new check-in at `now`.
    pub fn open(user_id: UserId, venue_id: VenueId, now: DateTime<Utc>) -> Self {
        Self {
            id: CheckinId::random(),
            user_id,
            venue_id,
            checkin_time: now,
            checkout_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a check-in from stored fields, validating its invariants.
    pub fn restore(record: CheckinRecord) -> Result<Self, CheckinStateError> {
        let CheckinRecord {
            id,
            user_id,
            venue_id,
            checkin_time,
            checkout_time,
            created_at,
            updated_at,
        } = record;

        if let Some(checkout) = checkout_time.filter(|checkout| *checkout < checkin_time) {
            return Err(CheckinStateError::CheckoutBeforeCheckin {
                checkin_time,
                checkout_time: checkout,
            });
        }
        if updated_at < created_at {
            return Err(CheckinStateError::TimestampsOutOfOrder);
        }

        Ok(Self {
            id,
            user_id,
            venue_id,
            checkin_time,
            checkout_time,
            created_at,
            updated_at,
        })
    }

    /// Stamp the checkout time.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Checkin, CheckinStateError, UserId, VenueId};
    /// use chrono::{Duration, Utc};
    ///
    /// let opened_at = Utc::now();
    /// let mut checkin = Checkin::open(UserId::random(), VenueId::random(), opened_at);
    /// checkin.close(opened_at + Duration::minutes(30)).expect("first close succeeds");
    /// assert!(matches!(
    ///     checkin.close(opened_at + Duration::minutes(31)),
    ///     Err(CheckinStateError::AlreadyClosed { .. })
    /// ));
    /// ```
    pub fn close(&mut self, now: DateTime<Utc>) -> Result<(), CheckinStateError> {
        if let Some(checkout_time) = self.checkout_time {
            return Err(CheckinStateError::AlreadyClosed { checkout_time });
        }
        if now < self.checkin_time {
            return Err(CheckinStateError::CheckoutBeforeCheckin {
                checkin_time: self.checkin_time,
                checkout_time: now,
            });
        }
        self.checkout_time = Some(now);
        self.updated_at = now.max(self.updated_at);
        Ok(())
    }

    pub fn id(&self) -> CheckinId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn venue_id(&self) -> VenueId {
        self.venue_id
    }

    pub fn checkin_time(&self) -> DateTime<Utc> {
        self.checkin_time
    }

    pub fn checkout_time(&self) -> Option<DateTime<Utc>> {
        self.checkout_time
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the user is still present.
    pub fn is_active(&self) -> bool {
        self.checkout_time.is_none()
    }

    pub fn record(&self) -> CheckinRecord {
        CheckinRecord {
            id: self.id,
            user_id: self.user_id,
            venue_id: self.venue_id,
            checkin_time: self.checkin_time,
            checkout_time: self.checkout_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn opened_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).single().expect("valid time")
    }

    #[fixture]
    fn checkin(opened_at: DateTime<Utc>) -> Checkin {
        Checkin::open(UserId::random(), VenueId::random(), opened_at)
    }

    #[rstest]
    fn open_checkin_is_active(checkin: Checkin, opened_at: DateTime<Utc>) {
        assert!(checkin.is_active());
        assert_eq!(checkin.checkin_time(), opened_at);
        assert_eq!(checkin.created_at(), opened_at);
        assert_eq!(checkin.updated_at(), opened_at);
    }

    #[rstest]
    fn close_stamps_checkout_and_updated_at(mut checkin: Checkin, opened_at: DateTime<Utc>) {
        let later = opened_at + Duration::minutes(45);
        checkin.close(later).expect("close succeeds");

        assert!(!checkin.is_active());
        assert_eq!(checkin.checkout_time(), Some(later));
        assert_eq!(checkin.updated_at(), later);
    }

    #[rstest]
    fn close_is_terminal(mut checkin: Checkin, opened_at: DateTime<Utc>) {
        let first = opened_at + Duration::minutes(10);
        checkin.close(first).expect("close succeeds");

        let result = checkin.close(first + Duration::minutes(10));

        assert_eq!(
            result,
            Err(CheckinStateError::AlreadyClosed {
                checkout_time: first
            })
        );
        assert_eq!(checkin.checkout_time(), Some(first));
    }

    #[rstest]
    fn close_at_checkin_instant_is_allowed(mut checkin: Checkin, opened_at: DateTime<Utc>) {
        checkin.close(opened_at).expect("zero-length stay is allowed");
        assert_eq!(checkin.checkout_time(), Some(opened_at));
    }

    #[rstest]
    fn close_rejects_time_before_checkin(mut checkin: Checkin, opened_at: DateTime<Utc>) {
        let result = checkin.close(opened_at - Duration::seconds(1));
        assert!(matches!(
            result,
            Err(CheckinStateError::CheckoutBeforeCheckin { .. })
        ));
        assert!(checkin.is_active());
    }

    #[rstest]
    fn restore_round_trips_record(mut checkin: Checkin, opened_at: DateTime<Utc>) {
        checkin
            .close(opened_at + Duration::minutes(5))
            .expect("close succeeds");
        let restored = Checkin::restore(checkin.record()).expect("valid record");
        assert_eq!(restored, checkin);
    }

    #[rstest]
    fn restore_rejects_checkout_before_checkin(checkin: Checkin, opened_at: DateTime<Utc>) {
        let mut record = checkin.record();
        record.checkout_time = Some(opened_at - Duration::minutes(1));
        assert!(matches!(
            Checkin::restore(record),
            Err(CheckinStateError::CheckoutBeforeCheckin { .. })
        ));
    }
}
