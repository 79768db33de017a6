//! Great-circle distance between coordinates.
//!
//! Nearby-search handlers compute the distance from the query point to each
//! result and sort ascending, so callers only need [`distance_km`] plus a
//! stable sort. The spherical-Earth approximation is accepted: no ellipsoidal
//! correction.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Range validation is the caller's responsibility: out-of-range degrees
/// yield a mathematically defined but meaningless distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Haversine distance between two coordinates, in kilometers.
///
/// Symmetric, zero for identical inputs, and monotonically increasing with
/// angular separation. Multiply by 1000 for meters.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUSTIN: Coordinate = Coordinate {
        latitude: 30.2672,
        longitude: -97.7431,
    };
    const DALLAS: Coordinate = Coordinate {
        latitude: 32.7767,
        longitude: -96.7970,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(distance_km(AUSTIN, AUSTIN).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(AUSTIN, DALLAS);
        let back = distance_km(DALLAS, AUSTIN);
        assert!((there - back).abs() < 1e-9, "{there} != {back}");
    }

    #[test]
    fn quarter_great_circle_along_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 90.0));
        // Quarter circumference of the 6371 km sphere.
        assert!((d - 10_007.5).abs() < 5.0, "got {d}");
    }

    #[test]
    fn austin_to_dallas_is_about_292_km() {
        let d = distance_km(AUSTIN, DALLAS);
        assert!((d - 292.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn distance_grows_with_angular_separation() {
        let origin = Coordinate::new(0.0, 0.0);
        let mut last = 0.0;
        for lon in 1..=179 {
            let d = distance_km(origin, Coordinate::new(0.0, f64::from(lon)));
            assert!(d > last, "distance should increase at lon {lon}");
            last = d;
        }
    }

    #[test]
    fn sorting_by_distance_is_stable_and_non_decreasing() {
        // Two places at the identical coordinate keep their input order.
        let origin = Coordinate::new(30.0, -97.0);
        let places = vec![
            ("far", Coordinate::new(32.0, -96.0)),
            ("tie-a", Coordinate::new(30.1, -97.0)),
            ("tie-b", Coordinate::new(30.1, -97.0)),
            ("near", Coordinate::new(30.01, -97.0)),
        ];

        let mut ranked: Vec<(&str, f64)> = places
            .iter()
            .map(|(name, c)| (*name, distance_km(origin, *c)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let names: Vec<&str> = ranked.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["near", "tie-a", "tie-b", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
