//! PostgreSQL-backed `VenueRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VenueRepository, VenueRepositoryError};
use crate::domain::{
    BoundingBox, Venue, VenueDetails, VenueDraft, VenueId, VenueValidationError,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{VenueRow, VenueWriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::venues;

/// Diesel-backed implementation of the venue repository port.
#[derive(Clone)]
pub struct DieselVenueRepository {
    pool: DbPool,
}

impl DieselVenueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VenueRepositoryError {
    map_basic_pool_error(error, VenueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> VenueRepositoryError {
    map_basic_diesel_error(
        error,
        VenueRepositoryError::query,
        VenueRepositoryError::connection,
    )
}

/// Escape `LIKE` wildcards so the fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn row_to_venue(row: VenueRow) -> Result<Venue, VenueRepositoryError> {
    let VenueRow {
        id,
        name,
        address,
        latitude,
        longitude,
        category,
        phone_number,
        website,
        age_restriction,
        cover_charge,
        description,
        photo_url,
        created_at,
        updated_at,
    } = row;
    let invalid = |err: VenueValidationError| {
        VenueRepositoryError::query(format!("stored venue {id}: {err}"))
    };
    let details = VenueDetails::try_from(VenueDraft {
        name,
        address,
        latitude,
        longitude,
        category,
        phone_number,
        website,
        age_restriction,
        cover_charge,
        description,
        photo_url,
    })
    .map_err(invalid)?;
    Venue::restore(VenueId::from_uuid(id), details, created_at, updated_at).map_err(invalid)
}

fn rows_to_venues(rows: Vec<VenueRow>) -> Result<Vec<Venue>, VenueRepositoryError> {
    rows.into_iter().map(row_to_venue).collect()
}

fn write_row(venue: &Venue) -> VenueWriteRow<'_> {
    let details = venue.details();
    let coordinates = details.coordinates();
    VenueWriteRow {
        id: *venue.id().as_uuid(),
        name: details.name(),
        address: details.address(),
        latitude: coordinates.latitude(),
        longitude: coordinates.longitude(),
        category: details.category(),
        phone_number: details.phone_number(),
        website: details.website(),
        age_restriction: details.age_restriction(),
        cover_charge: details.cover_charge(),
        description: details.description(),
        photo_url: details.photo_url(),
        created_at: venue.created_at(),
        updated_at: venue.updated_at(),
    }
}

#[async_trait]
impl VenueRepository for DieselVenueRepository {
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = venues::table
            .filter(venues::id.eq(id.as_uuid()))
            .select(VenueRow::as_select())
            .first::<VenueRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_venue).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VenueRow> = venues::table
            .order((venues::name.asc(), venues::id.asc()))
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_venues(rows)
    }

    async fn save(&self, venue: &Venue) -> Result<(), VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = write_row(venue);

        diesel::insert_into(venues::table)
            .values(&row)
            .on_conflict(venues::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VenueRow> = venues::table
            .filter(venues::category.eq(category))
            .order((venues::name.asc(), venues::id.asc()))
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_venues(rows)
    }

    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
    ) -> Result<Vec<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VenueRow> = venues::table
            .filter(venues::latitude.between(bounds.min_lat(), bounds.max_lat()))
            .filter(venues::longitude.between(bounds.min_lon(), bounds.max_lon()))
            .order((venues::name.asc(), venues::id.asc()))
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_venues(rows)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VenueRow> = venues::table
            .filter(venues::name.ilike(like_pattern(fragment)))
            .order((venues::name.asc(), venues::id.asc()))
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_venues(rows)
    }

    async fn delete(&self, id: &VenueId) -> Result<bool, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(venues::table.filter(venues::id.eq(id.as_uuid())))
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
    use rstest::rstest;

    use super::*;
    use crate::test_support::fixtures::venue_named;

    #[rstest]
    #[case("crow", "%crow%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_wildcards(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(fragment), expected);
    }

    #[rstest]
    fn written_rows_read_back_as_the_same_venue() {
        let venue = venue_named("The Tipsy Crow");
        let written = write_row(&venue);
        let row = VenueRow {
            id: written.id,
            name: written.name.to_owned(),
            address: written.address.map(str::to_owned),
            latitude: written.latitude,
            longitude: written.longitude,
            category: written.category.map(str::to_owned),
            phone_number: written.phone_number.map(str::to_owned),
            website: written.website.map(str::to_owned),
            age_restriction: written.age_restriction,
            cover_charge: written.cover_charge.map(str::to_owned),
            description: written.description.map(str::to_owned),
            photo_url: written.photo_url.map(str::to_owned),
            created_at: written.created_at,
            updated_at: written.updated_at,
        };
        assert_eq!(row_to_venue(row).expect("valid row"), venue);
    }

    #[rstest]
    fn out_of_range_rows_are_query_errors() {
        let venue = venue_named("Broken");
        let written = write_row(&venue);
        let row = VenueRow {
            id: written.id,
            name: written.name.to_owned(),
            address: None,
            latitude: 123.0,
            longitude: written.longitude,
            category: None,
            phone_number: None,
            website: None,
            age_restriction: None,
            cover_charge: None,
            description: None,
            photo_url: None,
            created_at: written.created_at,
            updated_at: written.updated_at,
        };
        assert!(matches!(
            row_to_venue(row),
            Err(VenueRepositoryError::Query { .. })
        ));
    }
}
