//! PostgreSQL-backed `CheckinRepository` implementation using Diesel ORM.
//!
//! Saving is an upsert keyed on the check-in id. The update branch keeps a
//! stored `checkout_time` when one exists, so a stale active copy of a
//! check-in can never reopen it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Timestamptz};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CheckinRepository, CheckinRepositoryError};
use crate::domain::{Checkin, CheckinId, CheckinRecord, UserId, VenueId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CheckinRow, NewCheckinRow};
use super::pool::{DbPool, PoolError};
use super::schema::checkins;

diesel::define_sql_function! {
    fn coalesce(x: Nullable<Timestamptz>, y: Nullable<Timestamptz>) -> Nullable<Timestamptz>;
}

/// Diesel-backed implementation of the check-in repository port.
#[derive(Clone)]
pub struct DieselCheckinRepository {
    pool: DbPool,
}

impl DieselCheckinRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CheckinRepositoryError {
    map_basic_pool_error(error, CheckinRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CheckinRepositoryError {
    map_basic_diesel_error(
        error,
        CheckinRepositoryError::query,
        CheckinRepositoryError::connection,
    )
}

fn row_to_checkin(row: CheckinRow) -> Result<Checkin, CheckinRepositoryError> {
    let CheckinRow {
        id,
        user_id,
        venue_id,
        checkin_time,
        checkout_time,
        created_at,
        updated_at,
    } = row;
    Checkin::restore(CheckinRecord {
        id: CheckinId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        venue_id: VenueId::from_uuid(venue_id),
        checkin_time,
        checkout_time,
        created_at,
        updated_at,
    })
    .map_err(|err| CheckinRepositoryError::query(format!("stored checkin {id}: {err}")))
}

fn rows_to_checkins(rows: Vec<CheckinRow>) -> Result<Vec<Checkin>, CheckinRepositoryError> {
    rows.into_iter().map(row_to_checkin).collect()
}

fn new_row(checkin: &Checkin) -> NewCheckinRow {
    let record = checkin.record();
    NewCheckinRow {
        id: *record.id.as_uuid(),
        user_id: *record.user_id.as_uuid(),
        venue_id: *record.venue_id.as_uuid(),
        checkin_time: record.checkin_time,
        checkout_time: record.checkout_time,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

#[async_trait]
impl CheckinRepository for DieselCheckinRepository {
    async fn find_by_id(&self, id: &CheckinId) -> Result<Option<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = checkins::table
            .filter(checkins::id.eq(id.as_uuid()))
            .select(CheckinRow::as_select())
            .first::<CheckinRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_checkin).transpose()
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CheckinRow> = checkins::table
            .filter(checkins::user_id.eq(user_id.as_uuid()))
            .filter(checkins::checkout_time.is_null())
            .order(checkins::checkin_time.desc())
            .select(CheckinRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_checkins(rows)
    }

    async fn find_active_by_venue(
        &self,
        venue_id: &VenueId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CheckinRow> = checkins::table
            .filter(checkins::venue_id.eq(venue_id.as_uuid()))
            .filter(checkins::checkout_time.is_null())
            .order(checkins::checkin_time.desc())
            .select(CheckinRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_checkins(rows)
    }

    async fn find_last_by_user_and_venue(
        &self,
        user_id: &UserId,
        venue_id: &VenueId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = checkins::table
            .filter(checkins::user_id.eq(user_id.as_uuid()))
            .filter(checkins::venue_id.eq(venue_id.as_uuid()))
            .order((checkins::checkin_time.desc(), checkins::created_at.desc()))
            .select(CheckinRow::as_select())
            .first::<CheckinRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_checkin).transpose()
    }

    async fn find_history_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CheckinRow> = checkins::table
            .filter(checkins::user_id.eq(user_id.as_uuid()))
            .order((checkins::checkin_time.desc(), checkins::id.desc()))
            .select(CheckinRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_checkins(rows)
    }

    async fn find_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CheckinRow> = checkins::table
            .filter(checkins::checkout_time.is_null())
            .filter(checkins::checkin_time.lt(cutoff))
            .order(checkins::checkin_time.asc())
            .select(CheckinRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_checkins(rows)
    }

    async fn save(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = new_row(checkin);

        diesel::insert_into(checkins::table)
            .values(&row)
            .on_conflict(checkins::id)
            .do_update()
            .set((
                checkins::checkout_time.eq(coalesce(
                    checkins::checkout_time,
                    excluded(checkins::checkout_time),
                )),
                checkins::updated_at.eq(excluded(checkins::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CheckinId) -> Result<bool, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(checkins::table.filter(checkins::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; queries run against PostgreSQL in the
    //! integration suites.
    use chrono::Duration;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::test_support::fixtures::t0;

    fn row(checkout_time: Option<DateTime<Utc>>) -> CheckinRow {
        CheckinRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            checkin_time: t0(),
            checkout_time,
            created_at: t0(),
            updated_at: checkout_time.unwrap_or(t0()),
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(t0() + Duration::minutes(45)))]
    fn rows_convert_to_checkins_and_back(#[case] checkout_time: Option<DateTime<Utc>>) {
        let stored = row(checkout_time);
        let checkin = row_to_checkin(stored).expect("valid row");
        assert_eq!(checkin.is_active(), checkout_time.is_none());

        let written = new_row(&checkin);
        assert_eq!(written.id, stored.id);
        assert_eq!(written.user_id, stored.user_id);
        assert_eq!(written.venue_id, stored.venue_id);
        assert_eq!(written.checkout_time, checkout_time);
    }

    #[rstest]
    fn inconsistent_rows_are_query_errors() {
        let mut stored = row(Some(t0() - Duration::minutes(1)));
        stored.updated_at = t0();
        let error = row_to_checkin(stored).expect_err("checkout precedes checkin");
        assert!(matches!(error, CheckinRepositoryError::Query { .. }));
    }
}
