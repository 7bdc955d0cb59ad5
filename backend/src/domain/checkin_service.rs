//! Check-in engine.
//!
//! Owns the presence state machine: check-in with duplicate and cooldown
//! guards, cascade closing of a user's other active check-ins, manual
//! checkout, and the expiry sweep. Every read-modify-write sequence for one
//! user runs under that user's [`KeyedLocks`] guard.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CheckInRequest, CheckinCommand, CheckinQuery, CheckinRepository, CheckinSweep, CheckinView,
    SweepOutcome, UserRepository, VenueRepository,
};
use crate::domain::service_support::{
    map_checkin_repository_error, map_user_repository_error, map_venue_repository_error,
};
use crate::domain::{
    Checkin, CheckinId, CheckinPolicy, CheckinStateError, CooldownStatus, Error, KeyedLocks,
    UserId, VenueId,
};

fn checkin_not_found(checkin_id: CheckinId) -> Error {
    Error::not_found(format!("checkin {checkin_id} not found")).with_details(json!({
        "code": "checkin_not_found",
        "checkinId": checkin_id,
    }))
}

/// Stamp `now` as the checkout time.
///
/// A check-in recorded with a later timestamp than `now` (clock skew between
/// replicas) is closed at its own check-in time instead, which keeps
/// `checkin_time <= checkout_time`.
fn stamp_checkout(checkin: &mut Checkin, now: DateTime<Utc>) -> Result<(), Error> {
    let checkin_id = checkin.id();
    let at = now.max(checkin.checkin_time());
    checkin.close(at).map_err(|error| match error {
        CheckinStateError::AlreadyClosed { .. } => {
            Error::conflict("user already checked out from this venue").with_details(json!({
                "code": "already_checked_out",
                "checkinId": checkin_id,
            }))
        }
        other => Error::internal(format!("checkin {checkin_id} is inconsistent: {other}")),
    })
}

/// Check-in engine implementing the command, query, and sweep driving ports.
///
/// Share one instance (behind an `Arc`) across every port so all paths use
/// the same per-user locks.
pub struct CheckinService<C, V, U> {
    checkins: Arc<C>,
    venues: Arc<V>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: CheckinPolicy,
    locks: KeyedLocks<UserId>,
}

impl<C, V, U> CheckinService<C, V, U> {
    /// Create an engine using the default cooldown and dwell limits.
    pub fn new(checkins: Arc<C>, venues: Arc<V>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            checkins,
            venues,
            users,
            clock,
            policy: CheckinPolicy::default(),
            locks: KeyedLocks::default(),
        }
    }

    /// Replace the cooldown and dwell limits.
    #[must_use]
    pub fn with_policy(mut self, policy: CheckinPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CheckinPolicy {
        self.policy
    }
}

impl<C, V, U> CheckinService<C, V, U>
where
    C: CheckinRepository,
    V: VenueRepository,
    U: UserRepository,
{
    async fn require_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .map(|_| ())
            .ok_or_else(|| {
                Error::not_found(format!("user {user_id} not found")).with_details(json!({
                    "code": "user_not_found",
                    "userId": user_id,
                }))
            })
    }

    async fn require_venue(&self, venue_id: &VenueId) -> Result<(), Error> {
        self.venues
            .find_by_id(venue_id)
            .await
            .map_err(map_venue_repository_error)?
            .map(|_| ())
            .ok_or_else(|| {
                Error::not_found(format!("venue {venue_id} not found")).with_details(json!({
                    "code": "venue_not_found",
                    "venueId": venue_id,
                }))
            })
    }

    async fn require_checkin(&self, checkin_id: CheckinId) -> Result<Checkin, Error> {
        self.checkins
            .find_by_id(&checkin_id)
            .await
            .map_err(map_checkin_repository_error)?
            .ok_or_else(|| checkin_not_found(checkin_id))
    }

    /// Refuse a check-in when the user is still present at the venue or the
    /// cooldown since their last checkout there has not elapsed.
    fn ensure_can_return(&self, last: &Checkin, now: DateTime<Utc>) -> Result<(), Error> {
        let Some(checkout_time) = last.checkout_time() else {
            return Err(
                Error::conflict("user is already checked in to this venue").with_details(json!({
                    "code": "already_checked_in",
                    "checkinId": last.id(),
                })),
            );
        };

        match self.policy.cooldown_status(checkout_time, now) {
            CooldownStatus::Elapsed => Ok(()),
            CooldownStatus::Remaining { minutes } => Err(Error::conflict(format!(
                "user is in cooldown; try again in {minutes} minutes"
            ))
            .with_details(json!({
                "code": "cooldown_active",
                "remainingMinutes": minutes,
            }))),
        }
    }

    /// Close every active check-in of the user. Caller holds the user lock.
    async fn close_active_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<usize, Error> {
        let active = self
            .checkins
            .find_active_by_user(user_id)
            .await
            .map_err(map_checkin_repository_error)?;

        let mut closed = 0;
        for mut checkin in active.into_iter().filter(Checkin::is_active) {
            stamp_checkout(&mut checkin, now)?;
            self.checkins
                .save(&checkin)
                .await
                .map_err(map_checkin_repository_error)?;
            debug!(
                checkin_id = %checkin.id(),
                user_id = %user_id,
                venue_id = %checkin.venue_id(),
                "auto-checked-out previous venue"
            );
            closed += 1;
        }
        Ok(closed)
    }
}

#[async_trait]
impl<C, V, U> CheckinCommand for CheckinService<C, V, U>
where
    C: CheckinRepository,
    V: VenueRepository,
    U: UserRepository,
{
    async fn check_in(&self, request: CheckInRequest) -> Result<Checkin, Error> {
        let CheckInRequest { user_id, venue_id } = request;
        self.require_user(&user_id).await?;
        self.require_venue(&venue_id).await?;

        let _guard = self.locks.lock(user_id).await;
        let now = self.clock.utc();

        let last = self
            .checkins
            .find_last_by_user_and_venue(&user_id, &venue_id)
            .await
            .map_err(map_checkin_repository_error)?;
        if let Some(last) = last {
            self.ensure_can_return(&last, now)?;
        }

        let closed_previous = self.close_active_for_user(&user_id, now).await?;

        let checkin = Checkin::open(user_id, venue_id, now);
        self.checkins
            .save(&checkin)
            .await
            .map_err(map_checkin_repository_error)?;

        info!(
            checkin_id = %checkin.id(),
            user_id = %user_id,
            venue_id = %venue_id,
            closed_previous,
            "user checked in"
        );
        Ok(checkin)
    }

    async fn check_out(&self, checkin_id: CheckinId) -> Result<Checkin, Error> {
        let owner = self.require_checkin(checkin_id).await?.user_id();

        let _guard = self.locks.lock(owner).await;
        let mut checkin = self.require_checkin(checkin_id).await?;
        let now = self.clock.utc();
        stamp_checkout(&mut checkin, now)?;
        self.checkins
            .save(&checkin)
            .await
            .map_err(map_checkin_repository_error)?;

        info!(
            checkin_id = %checkin_id,
            user_id = %owner,
            venue_id = %checkin.venue_id(),
            "user checked out"
        );
        Ok(checkin)
    }

    async fn delete_checkin(&self, checkin_id: CheckinId) -> Result<(), Error> {
        let owner = self.require_checkin(checkin_id).await?.user_id();

        let _guard = self.locks.lock(owner).await;
        let deleted = self
            .checkins
            .delete(&checkin_id)
            .await
            .map_err(map_checkin_repository_error)?;
        if !deleted {
            return Err(checkin_not_found(checkin_id));
        }
        info!(checkin_id = %checkin_id, user_id = %owner, "checkin deleted");
        Ok(())
    }
}

#[async_trait]
impl<C, V, U> CheckinQuery for CheckinService<C, V, U>
where
    C: CheckinRepository,
    V: VenueRepository,
    U: UserRepository,
{
    async fn active_for_venue(&self, venue_id: VenueId) -> Result<Vec<Checkin>, Error> {
        self.checkins
            .find_active_by_venue(&venue_id)
            .await
            .map_err(map_checkin_repository_error)
    }

    async fn history_for_user(&self, user_id: UserId) -> Result<Vec<Checkin>, Error> {
        let mut history = self
            .checkins
            .find_history_by_user(&user_id)
            .await
            .map_err(map_checkin_repository_error)?;
        history.sort_by(|a, b| b.checkin_time().cmp(&a.checkin_time()));
        Ok(history)
    }

    async fn describe(&self, checkins: Vec<Checkin>) -> Result<Vec<CheckinView>, Error> {
        let user_ids: BTreeSet<UserId> = checkins.iter().map(Checkin::user_id).collect();
        let venue_ids: BTreeSet<VenueId> = checkins.iter().map(Checkin::venue_id).collect();

        let mut usernames = HashMap::with_capacity(user_ids.len());
        for user_id in user_ids {
            let user = self
                .users
                .find_by_id(&user_id)
                .await
                .map_err(map_user_repository_error)?;
            if let Some(user) = user {
                usernames.insert(user_id, user.username().to_owned());
            }
        }

        let mut venue_names = HashMap::with_capacity(venue_ids.len());
        for venue_id in venue_ids {
            let venue = self
                .venues
                .find_by_id(&venue_id)
                .await
                .map_err(map_venue_repository_error)?;
            if let Some(venue) = venue {
                venue_names.insert(venue_id, venue.name().to_owned());
            }
        }

        Ok(checkins
            .into_iter()
            .map(|checkin| CheckinView {
                username: usernames.get(&checkin.user_id()).cloned(),
                venue_name: venue_names.get(&checkin.venue_id()).cloned(),
                checkin,
            })
            .collect())
    }
}

#[async_trait]
impl<C, V, U> CheckinSweep for CheckinService<C, V, U>
where
    C: CheckinRepository,
    V: VenueRepository,
    U: UserRepository,
{
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<SweepOutcome, Error> {
        let cutoff = self.policy.expiry_cutoff(now);
        let candidates = self
            .checkins
            .find_expired(cutoff)
            .await
            .map_err(map_checkin_repository_error)?;

        let mut outcome = SweepOutcome {
            candidates: candidates.len(),
            closed: 0,
        };
        for candidate in candidates {
            let _guard = self.locks.lock(candidate.user_id()).await;
            // Another path may have closed or deleted it since the query ran.
            let current = self
                .checkins
                .find_by_id(&candidate.id())
                .await
                .map_err(map_checkin_repository_error)?;
            let Some(mut checkin) = current else {
                continue;
            };
            if !checkin.is_active() || checkin.checkin_time() >= cutoff {
                continue;
            }

            stamp_checkout(&mut checkin, now)?;
            self.checkins
                .save(&checkin)
                .await
                .map_err(map_checkin_repository_error)?;
            debug!(
                checkin_id = %checkin.id(),
                user_id = %checkin.user_id(),
                "closed overstayed checkin"
            );
            outcome.closed += 1;
        }

        info!(
            candidates = outcome.candidates,
            closed = outcome.closed,
            cutoff = %cutoff,
            "expiry sweep finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "checkin_service_tests.rs"]
mod tests;
