//! Rectangular proximity search.
//!
//! A circle of `radius` miles around a centre is approximated by the
//! latitude/longitude rectangle that encloses it: one degree of latitude is
//! taken as 69 miles everywhere, and one degree of longitude as
//! `69 * cos(latitude)` miles. Venues in the rectangle's corners lie outside
//! the circle but are still returned.

use std::fmt;

/// Miles per degree of latitude.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Largest absolute centre latitude accepted by [`BoundingBox::around`].
///
/// Beyond this the longitude span diverges as `cos(latitude)` approaches 0.
pub const MAX_QUERY_LATITUDE: f64 = 89.9;

/// Errors raised while building a search rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoQueryError {
    NonFiniteCoordinate { field: &'static str, value: f64 },
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    PolarLatitude { value: f64 },
    InvalidRadius { value: f64 },
    InvertedBounds,
}

impl GeoQueryError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonFiniteCoordinate { field, .. } => field,
            Self::LatitudeOutOfRange { .. } | Self::PolarLatitude { .. } => "lat",
            Self::LongitudeOutOfRange { .. } => "lon",
            Self::InvalidRadius { .. } => "radiusMi",
            Self::InvertedBounds => "bounds",
        }
    }
}

impl fmt::Display for GeoQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteCoordinate { field, value } => {
                write!(f, "{field} must be a finite number, got {value}")
            }
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be between -90 and 90, got {value}")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be between -180 and 180, got {value}")
            }
            Self::PolarLatitude { value } => write!(
                f,
                "latitude {value} is too close to a pole for a radius search (limit ±{MAX_QUERY_LATITUDE})"
            ),
            Self::InvalidRadius { value } => {
                write!(f, "radius must be a positive number of miles, got {value}")
            }
            Self::InvertedBounds => write!(f, "bounding box minimum exceeds maximum"),
        }
    }
}

impl std::error::Error for GeoQueryError {}

/// Positive, finite search radius in miles.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Validate a radius.
    pub fn new(miles: f64) -> Result<Self, GeoQueryError> {
        if !miles.is_finite() || miles <= 0.0 {
            return Err(GeoQueryError::InvalidRadius { value: miles });
        }
        Ok(Self(miles))
    }

    pub fn miles(self) -> f64 {
        self.0
    }
}

/// Inclusive latitude/longitude rectangle.
///
/// Bounds are not clamped to the globe: a rectangle computed near the
/// antimeridian may extend past ±180 and simply matches nothing there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Create a rectangle from explicit bounds.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Self, GeoQueryError> {
        for (field, value) in [
            ("minLat", min_lat),
            ("maxLat", max_lat),
            ("minLon", min_lon),
            ("maxLon", max_lon),
        ] {
            if !value.is_finite() {
                return Err(GeoQueryError::NonFiniteCoordinate { field, value });
            }
        }
        if min_lat > max_lat || min_lon > max_lon {
            return Err(GeoQueryError::InvertedBounds);
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Rectangle enclosing the circle of `radius` around (`lat`, `lon`).
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{BoundingBox, SearchRadius};
    ///
    /// let radius = SearchRadius::new(69.0).expect("positive radius");
    /// let bounds = BoundingBox::around(0.0, 0.0, radius).expect("valid centre");
    /// assert!((bounds.max_lat() - 1.0).abs() < 1e-9);
    /// assert!((bounds.max_lon() - 1.0).abs() < 1e-9);
    /// ```
    pub fn around(lat: f64, lon: f64, radius: SearchRadius) -> Result<Self, GeoQueryError> {
        if !lat.is_finite() {
            return Err(GeoQueryError::NonFiniteCoordinate {
                field: "lat",
                value: lat,
            });
        }
        if !lon.is_finite() {
            return Err(GeoQueryError::NonFiniteCoordinate {
                field: "lon",
                value: lon,
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoQueryError::LatitudeOutOfRange { value: lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoQueryError::LongitudeOutOfRange { value: lon });
        }
        if lat.abs() >= MAX_QUERY_LATITUDE {
            return Err(GeoQueryError::PolarLatitude { value: lat });
        }

        let d_lat = radius.miles() / MILES_PER_DEGREE;
        let d_lon = radius.miles() / (MILES_PER_DEGREE * lat.to_radians().cos());

        Self::new(lat - d_lat, lat + d_lat, lon - d_lon, lon + d_lon)
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn radius(miles: f64) -> SearchRadius {
        SearchRadius::new(miles).expect("valid radius")
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn radius_rejects_non_positive_or_non_finite(#[case] miles: f64) {
        assert!(matches!(
            SearchRadius::new(miles),
            Err(GeoQueryError::InvalidRadius { .. })
        ));
    }

    #[rstest]
    fn longitude_span_widens_with_latitude() {
        let equator = BoundingBox::around(0.0, 10.0, radius(10.0)).expect("valid");
        let north = BoundingBox::around(60.0, 10.0, radius(10.0)).expect("valid");

        let equator_span = equator.max_lon() - equator.min_lon();
        let north_span = north.max_lon() - north.min_lon();
        // cos(60°) = 0.5, so the span doubles.
        assert!((north_span - 2.0 * equator_span).abs() < 1e-9);
        assert!(
            ((north.max_lat() - north.min_lat()) - (equator.max_lat() - equator.min_lat())).abs()
                < 1e-12
        );
    }

    #[rstest]
    fn box_contains_centre_and_excludes_far_point() {
        let bounds = BoundingBox::around(40.7128, -74.0060, radius(5.0)).expect("valid");
        assert!(bounds.contains(40.7128, -74.0060));
        // Roughly 100 miles north.
        assert!(!bounds.contains(42.16, -74.0060));
    }

    #[rstest]
    fn edges_are_inclusive() {
        let bounds = BoundingBox::new(1.0, 2.0, 3.0, 4.0).expect("valid");
        assert!(bounds.contains(1.0, 3.0));
        assert!(bounds.contains(2.0, 4.0));
        assert!(!bounds.contains(2.000_001, 4.0));
    }

    #[rstest]
    #[case(89.9)]
    #[case(-89.95)]
    #[case(90.0)]
    fn polar_centres_are_rejected(#[case] lat: f64) {
        assert!(matches!(
            BoundingBox::around(lat, 0.0, radius(1.0)),
            Err(GeoQueryError::PolarLatitude { .. })
        ));
    }

    #[rstest]
    fn out_of_range_centre_is_rejected() {
        assert!(matches!(
            BoundingBox::around(0.0, 181.0, radius(1.0)),
            Err(GeoQueryError::LongitudeOutOfRange { .. })
        ));
        assert!(matches!(
            BoundingBox::around(f64::NAN, 0.0, radius(1.0)),
            Err(GeoQueryError::NonFiniteCoordinate { field: "lat", .. })
        ));
    }

    #[rstest]
    fn box_near_antimeridian_is_not_wrapped() {
        let bounds = BoundingBox::around(0.0, 179.9, radius(69.0)).expect("valid");
        assert!(bounds.max_lon() > 180.0);
        assert!(!bounds.contains(0.0, -179.9));
    }

    #[rstest]
    fn inverted_bounds_are_rejected() {
        assert_eq!(
            BoundingBox::new(2.0, 1.0, 0.0, 1.0),
            Err(GeoQueryError::InvertedBounds)
        );
    }

    #[rstest]
    fn error_fields_match_query_parameters() {
        assert_eq!(GeoQueryError::PolarLatitude { value: 90.0 }.field(), "lat");
        assert_eq!(GeoQueryError::InvalidRadius { value: 0.0 }.field(), "radiusMi");
    }
}
