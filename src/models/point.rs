// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPS sample types: raw sensor fixes, accepted points, replay samples.

use serde::{Deserialize, Serialize};

/// Conversion factor from sensor speed (m/s) to display speed (km/h).
const MS_TO_KMH: f64 = 3.6;

/// One raw location-sensor sample, before admission.
///
/// Sensors report speed in m/s and may omit it entirely (stationary or
/// speed-less fixes). The ingestion handler stamps the receipt time itself,
/// so a fix carries no timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Sensor speed in meters per second, if reported.
    pub speed_ms: Option<f64>,
    pub altitude: Option<f64>,
    /// Sensor-reported horizontal accuracy, meters.
    pub accuracy_m: f64,
}

/// One accepted location sample in the in-memory ride buffer.
///
/// The buffer lives only for the duration of the active session; it is never
/// persisted. Only the session identity survives a reload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Speed in km/h, non-negative. Absent sensor speed is recorded as 0.
    pub speed_kmh: f64,
    pub altitude: Option<f64>,
    /// Epoch seconds at receipt.
    pub timestamp: i64,
    /// Accuracy of the originating fix; replayed points carry none.
    pub accuracy_m: Option<f64>,
}

impl GpsPoint {
    /// Accept a raw fix, normalizing its speed.
    pub fn from_fix(fix: &GpsFix, timestamp: i64) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            speed_kmh: fix.speed_ms.unwrap_or(0.0).max(0.0) * MS_TO_KMH,
            altitude: fix.altitude,
            timestamp,
            accuracy_m: Some(fix.accuracy_m),
        }
    }
}

/// One point of an imported track, as parsed by the backend's GPX upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub lat: f64,
    pub lon: f64,
    /// Elevation, when the track file carries one.
    #[serde(default)]
    pub ele: Option<f64>,
}
