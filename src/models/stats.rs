// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride statistics, recomputed from the point buffer on every accepted point.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::haversine_km;
use crate::models::GpsPoint;

/// Snapshot of the running ride statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RideStats {
    /// Sum of pairwise great-circle distances between consecutive points.
    pub distance_km: f64,
    /// Speed of the most recently buffered point.
    pub current_kmh: f64,
    /// Mean of all strictly positive speeds seen; 0 if none.
    pub avg_kmh: f64,
    /// Max of all strictly positive speeds seen; 0 if none.
    pub top_kmh: f64,
    /// Wall-clock seconds since the ride started.
    pub elapsed_secs: i64,
}

impl RideStats {
    /// Recompute all statistics from the full buffer.
    ///
    /// Zero-speed samples (stationary fixes) are excluded from the average
    /// and the maximum, not treated as zero contributions.
    pub fn compute(points: &[GpsPoint], started_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let distance_km = points
            .windows(2)
            .map(|pair| haversine_km(pair[0].latitude, pair[0].longitude, pair[1].latitude, pair[1].longitude))
            .sum();

        let mut positive_count = 0u32;
        let mut speed_sum = 0.0;
        let mut top_kmh = 0.0f64;
        for point in points {
            if point.speed_kmh > 0.0 {
                positive_count += 1;
                speed_sum += point.speed_kmh;
                top_kmh = top_kmh.max(point.speed_kmh);
            }
        }
        let avg_kmh = if positive_count > 0 {
            speed_sum / positive_count as f64
        } else {
            0.0
        };

        Self {
            distance_km,
            current_kmh: points.last().map_or(0.0, |p| p.speed_kmh),
            avg_kmh,
            top_kmh,
            elapsed_secs: (now - started_at).num_seconds().max(0),
        }
    }
}
