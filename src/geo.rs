// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance helpers.

/// Earth radius used by the haversine formula (kilometers).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_same_point() {
        assert_eq!(haversine_km(42.6955, 23.3322, 42.6955, 23.3322), 0.0);
    }

    #[test]
    fn test_known_distance_sofia_to_plovdiv() {
        // Sofia (42.6977, 23.3219) to Plovdiv (42.1354, 24.7453): ~133 km.
        let d = haversine_km(42.6977, 23.3219, 42.1354, 24.7453);
        assert!((d - 133.0).abs() < 2.0, "got {} km", d);
    }

    #[test]
    fn test_symmetry() {
        let a = haversine_km(42.6955, 23.3322, 42.6965, 23.3340);
        let b = haversine_km(42.6965, 23.3340, 42.6955, 23.3322);
        assert!((a - b).abs() < 1e-12);
    }
}
