// src/services/distance.rs
// DOCUMENTATION: Great-circle distance utilities
// PURPOSE: Pure haversine math used for ranking search results

use crate::models::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers
/// DOCUMENTATION: Haversine formula, deterministic and pure
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Round a distance to 2 decimal places (half away from zero)
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Inclusive radius check
pub fn within_radius(distance_km: f64, radius_km: f64) -> bool {
    distance_km <= radius_km
}

/// Stable ascending sort by distance from `origin`
/// DOCUMENTATION: Ties keep their original relative order - input order is
/// itself a locality hint from the provider. Entries without a coordinate
/// sort last.
pub fn sort_by_distance<T, F>(items: &mut [T], origin: Coordinate, coordinate_of: F)
where
    F: Fn(&T) -> Option<Coordinate>,
{
    items.sort_by(|a, b| {
        let da = coordinate_of(a).map(|c| distance_km(origin, c));
        let db = coordinate_of(b).map(|c| distance_km(origin, c));
        match (da, db) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_symmetry_and_identity() {
        let a = Coordinate::new(12.9121, 77.6446);
        let b = Coordinate::new(12.9352, 77.6245);

        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-12);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        // One degree of latitude is ~111.19 km; 1/111.19 degrees is ~1 km
        let a = Coordinate::new(12.9121, 77.6446);
        let b = Coordinate::new(12.9121 + 1.0 / 111.19, 77.6446);

        let d = distance_km(a, b);
        assert!((d - 1.0).abs() < 0.01, "expected ~1.00 km, got {}", d);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1.2345), 1.23);
        assert_eq!(round_km(1.235), 1.24);
        assert_eq!(round_km(0.0), 0.0);
    }

    #[test]
    fn test_within_radius_is_inclusive() {
        assert!(within_radius(5.0, 5.0));
        assert!(within_radius(4.99, 5.0));
        assert!(!within_radius(5.01, 5.0));
    }

    #[test]
    fn test_sort_by_distance_stable() {
        let origin = Coordinate::new(0.0, 0.0);
        // Two entries at identical distance plus one nearer and one unknown
        let mut items = vec![
            ("far_a", Some(Coordinate::new(0.02, 0.0))),
            ("far_b", Some(Coordinate::new(0.02, 0.0))),
            ("near", Some(Coordinate::new(0.01, 0.0))),
            ("unknown", None),
        ];

        sort_by_distance(&mut items, origin, |i| i.1);

        let order: Vec<&str> = items.iter().map(|i| i.0).collect();
        assert_eq!(order, vec!["near", "far_a", "far_b", "unknown"]);
    }
}
