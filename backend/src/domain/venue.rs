//! Venue model and attribute validation.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::define_entity_id;

define_entity_id! {
    /// Stable venue identifier stored as a UUID.
    VenueId
}

/// Validation errors returned when building venue attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum VenueValidationError {
    EmptyName,
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    NegativeAgeRestriction { value: i32 },
    TimestampsOutOfOrder,
}

impl fmt::Display for VenueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "venue name must not be empty"),
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be a finite value between -90 and 90, got {value}")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be a finite value between -180 and 180, got {value}")
            }
            Self::NegativeAgeRestriction { value } => {
                write!(f, "age restriction must not be negative, got {value}")
            }
            Self::TimestampsOutOfOrder => write!(f, "updated_at must not precede created_at"),
        }
    }
}

impl std::error::Error for VenueValidationError {}

/// Validated WGS84 position of a venue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and build a coordinate pair.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Coordinates;
    ///
    /// assert!(Coordinates::new(51.5, -0.12).is_ok());
    /// assert!(Coordinates::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, VenueValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(VenueValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(VenueValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Raw, unvalidated venue attributes supplied by callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueDraft {
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub age_restriction: Option<i32>,
    pub cover_charge: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

/// Validated, editable attributes of a venue.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueDetails {
    name: String,
    address: Option<String>,
    coordinates: Coordinates,
    category: Option<String>,
    phone_number: Option<String>,
    website: Option<String>,
    age_restriction: Option<i32>,
    cover_charge: Option<String>,
    description: Option<String>,
    photo_url: Option<String>,
}

impl TryFrom<VenueDraft> for VenueDetails {
    type Error = VenueValidationError;

    fn try_from(draft: VenueDraft) -> Result<Self, Self::Error> {
        let VenueDraft {
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
        } = draft;

        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(VenueValidationError::EmptyName);
        }
        if let Some(value) = age_restriction.filter(|value| *value < 0) {
            return Err(VenueValidationError::NegativeAgeRestriction { value });
        }
        let coordinates = Coordinates::new(latitude, longitude)?;

        Ok(Self {
            name,
            address,
            coordinates,
            category,
            phone_number,
            website,
            age_restriction,
            cover_charge,
            description,
            photo_url,
        })
    }
}

impl From<&VenueDetails> for VenueDraft {
    fn from(value: &VenueDetails) -> Self {
        Self {
            name: value.name.clone(),
            address: value.address.clone(),
            latitude: value.coordinates.latitude(),
            longitude: value.coordinates.longitude(),
            category: value.category.clone(),
            phone_number: value.phone_number.clone(),
            website: value.website.clone(),
            age_restriction: value.age_restriction,
            cover_charge: value.cover_charge.clone(),
            description: value.description.clone(),
            photo_url: value.photo_url.clone(),
        }
    }
}

impl VenueDetails {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn age_restriction(&self) -> Option<i32> {
        self.age_restriction
    }

    pub fn cover_charge(&self) -> Option<&str> {
        self.cover_charge.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }
}

/// A place users can check in to.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    id: VenueId,
    details: VenueDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Venue {
    /// Create a new venue stamped with `now`.
    pub fn create(id: VenueId, details: VenueDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a venue loaded from storage.
    pub fn restore(
        id: VenueId,
        details: VenueDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, VenueValidationError> {
        if updated_at < created_at {
            return Err(VenueValidationError::TimestampsOutOfOrder);
        }
        Ok(Self {
            id,
            details,
            created_at,
            updated_at,
        })
    }

    /// Replace every editable attribute and refresh `updated_at`.
    ///
    /// `updated_at` never moves backwards, even with a lagging clock.
    pub fn replace_details(&mut self, details: VenueDetails, now: DateTime<Utc>) {
        self.details = details;
        self.updated_at = now.max(self.updated_at);
    }

    pub fn id(&self) -> VenueId {
        self.id
    }

    pub fn details(&self) -> &VenueDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn coordinates(&self) -> Coordinates {
        self.details.coordinates()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn draft() -> VenueDraft {
        VenueDraft {
            name: "  The Blue Note ".to_owned(),
            latitude: 40.7306,
            longitude: -74.0007,
            category: Some("jazz".to_owned()),
            age_restriction: Some(21),
            ..VenueDraft::default()
        }
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 21, 0, 0).single().expect("valid time")
    }

    #[rstest]
    fn trims_name(draft: VenueDraft) {
        let details = VenueDetails::try_from(draft).expect("valid venue");
        assert_eq!(details.name(), "The Blue Note");
    }

    #[rstest]
    fn rejects_blank_name(mut draft: VenueDraft) {
        draft.name = "   ".to_owned();
        assert_eq!(
            VenueDetails::try_from(draft),
            Err(VenueValidationError::EmptyName)
        );
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, -180.5)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_out_of_range_coordinates(
        mut draft: VenueDraft,
        #[case] latitude: f64,
        #[case] longitude: f64,
    ) {
        draft.latitude = latitude;
        draft.longitude = longitude;
        assert!(VenueDetails::try_from(draft).is_err());
    }

    #[rstest]
    fn accepts_boundary_coordinates(mut draft: VenueDraft) {
        draft.latitude = -90.0;
        draft.longitude = 180.0;
        assert!(VenueDetails::try_from(draft).is_ok());
    }

    #[rstest]
    fn rejects_negative_age_restriction(mut draft: VenueDraft) {
        draft.age_restriction = Some(-1);
        assert_eq!(
            VenueDetails::try_from(draft),
            Err(VenueValidationError::NegativeAgeRestriction { value: -1 })
        );
    }

    #[rstest]
    fn replace_details_keeps_identity_and_creation_time(draft: VenueDraft, now: DateTime<Utc>) {
        let details = VenueDetails::try_from(draft.clone()).expect("valid venue");
        let mut venue = Venue::create(VenueId::random(), details, now);
        let id = venue.id();

        let mut renamed = draft;
        renamed.name = "Village Vanguard".to_owned();
        let later = now + Duration::minutes(5);
        venue.replace_details(VenueDetails::try_from(renamed).expect("valid venue"), later);

        assert_eq!(venue.id(), id);
        assert_eq!(venue.name(), "Village Vanguard");
        assert_eq!(venue.created_at(), now);
        assert_eq!(venue.updated_at(), later);
    }

    #[rstest]
    fn restore_rejects_inverted_timestamps(draft: VenueDraft, now: DateTime<Utc>) {
        let details = VenueDetails::try_from(draft).expect("valid venue");
        let result = Venue::restore(VenueId::random(), details, now, now - Duration::seconds(1));
        assert_eq!(result, Err(VenueValidationError::TimestampsOutOfOrder));
    }
}
