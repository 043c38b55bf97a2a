//! Coordinates, great-circle distance and map bounds.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius used for every distance shown to users.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Conversion used when handing a mile radius to the Overpass `around` filter.
pub const MILES_TO_METERS: f64 = 1609.34;

/// A latitude/longitude pair in degrees.
///
/// Values are validated on construction and never mutated afterwards; a new
/// position replaces the old one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is NaN,
    /// infinite, or outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CoreError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses `"lat,lng"` as used by `MEDMAP_DEVICE_POSITION` and CLI flags.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either half is missing,
    /// unparseable, or out of range.
    pub fn parse_pair(raw: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidCoordinate {
            latitude: f64::NAN,
            longitude: f64::NAN,
        };
        let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let longitude = lng.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(latitude, longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Great-circle distance in kilometres between two coordinates.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Axis-aligned lat/lng rectangle used to fit the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box containing every coordinate, or `None` for an empty input.
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let init = Self {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(iter.fold(init, |b, c| Self {
            south: b.south.min(c.latitude),
            west: b.west.min(c.longitude),
            north: b.north.max(c.latitude),
            east: b.east.max(c.longitude),
        }))
    }

    /// Grows each side by `ratio` of the box's span (Leaflet `pad` semantics).
    #[must_use]
    pub fn pad(self, ratio: f64) -> Self {
        let lat_pad = (self.north - self.south) * ratio;
        let lng_pad = (self.east - self.west) * ratio;
        Self {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    #[must_use]
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.south..=self.north).contains(&c.latitude)
            && (self.west..=self.east).contains(&c.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn connaught_place_to_north_delhi_distance() {
        // 6371 km mean radius puts this pair at 14.44 km.
        let d = haversine_km(coord(28.6139, 77.2090), coord(28.7041, 77.1025));
        assert!((d - 14.44).abs() < 0.01, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = coord(12.9716, 77.5946);
        let b = coord(19.0760, 72.8777);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let a = coord(28.6139, 77.2090);
        assert!(haversine_km(a, a).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_finite_and_out_of_range() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
    }

    #[test]
    fn parses_lat_lng_pair() {
        let c = Coordinate::parse_pair(" 28.6139 , 77.2090 ").unwrap();
        assert_eq!(c, coord(28.6139, 77.2090));
        assert!(Coordinate::parse_pair("28.6").is_err());
        assert!(Coordinate::parse_pair("north,east").is_err());
    }

    #[test]
    fn enclosing_box_of_nothing_is_none() {
        assert!(BoundingBox::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn pad_grows_each_side_by_ratio_of_span() {
        let b = BoundingBox::enclosing([coord(10.0, 20.0), coord(20.0, 40.0)])
            .unwrap()
            .pad(0.1);
        assert!((b.south - 9.0).abs() < 1e-9);
        assert!((b.north - 21.0).abs() < 1e-9);
        assert!((b.west - 18.0).abs() < 1e-9);
        assert!((b.east - 42.0).abs() < 1e-9);
        assert!(b.contains(coord(15.0, 30.0)));
    }
}
