// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride backend API client.
//!
//! Thin typed wrapper over the four endpoints the tracker consumes:
//! `/ride/start`, `/ride/add-gps-point`, `/ride/stop` and
//! `/ride/upload-gpx`. Responses are validated explicitly; a response the
//! backend marks as failed is an [`TrackerError::Api`] carrying the
//! server-supplied reason when present.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::models::{GpsPoint, TrackSample};

/// Metadata submitted with the final trip.
#[derive(Debug, Clone)]
pub struct RideMetadata {
    pub title: String,
    pub description: String,
    pub public: bool,
}

impl RideMetadata {
    /// Title to submit; an empty title falls back to the default.
    fn effective_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "My Ride"
        } else {
            &self.title
        }
    }
}

/// One photo attached to the final trip.
#[derive(Debug, Clone)]
pub struct RidePhoto {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct StartRideResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    ride_id: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GpxUploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    points: Vec<TrackSample>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddGpsPointRequest {
    ride_id: i64,
    latitude: f64,
    longitude: f64,
    speed: f64,
    altitude: Option<f64>,
    timestamp: i64,
}

/// Ride backend client.
#[derive(Clone)]
pub struct RideApi {
    http: reqwest::Client,
    base_url: String,
}

impl RideApi {
    /// Create a client against a backend base URL (e.g. `http://host/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Request a new ride. Returns the issued ride id.
    ///
    /// Only a response with an explicit success flag AND a positive numeric
    /// ride id is accepted; anything else is rejected without touching local
    /// state.
    pub async fn start_ride(&self, bike_id: Option<&str>) -> Result<i64> {
        let url = format!("{}/ride/start", self.base_url);
        let body = serde_json::json!({ "bike_id": bike_id });

        let response: StartRideResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        validate_start(response)
    }

    /// Submit one accepted GPS point for a ride.
    pub async fn add_gps_point(&self, ride_id: i64, point: &GpsPoint) -> Result<()> {
        let url = format!("{}/ride/add-gps-point", self.base_url);
        let body = AddGpsPointRequest {
            ride_id,
            latitude: point.latitude,
            longitude: point.longitude,
            speed: point.speed_kmh,
            altitude: point.altitude,
            timestamp: point.timestamp,
        };

        let response: AckResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(TrackerError::Api(
                response.error.unwrap_or_else(|| "add-gps-point rejected".to_string()),
            ))
        }
    }

    /// Fire-and-forget point forwarding for the live ingestion path.
    ///
    /// At-most-once, best-effort: failures are logged and never retried, and
    /// nothing blocks local statistics or further ingestion on the outcome.
    pub fn forward_point(&self, ride_id: i64, point: GpsPoint) {
        let api = self.clone();
        tokio::spawn(async move {
            if let Err(err) = api.add_gps_point(ride_id, &point).await {
                tracing::warn!(ride_id, error = %err, "Failed to forward GPS point");
            }
        });
    }

    /// Submit the accumulated trip with its metadata and photos.
    pub async fn stop_ride(
        &self,
        ride_id: i64,
        metadata: &RideMetadata,
        photos: Vec<RidePhoto>,
    ) -> Result<()> {
        let url = format!("{}/ride/stop", self.base_url);

        let mut form = reqwest::multipart::Form::new()
            .text("ride_id", ride_id.to_string())
            .text("title", metadata.effective_title().to_string())
            .text("description", metadata.description.clone())
            .text("public", metadata.public.to_string());
        for photo in photos {
            let part = reqwest::multipart::Part::bytes(photo.bytes).file_name(photo.filename);
            form = form.part("photos", part);
        }

        let response: AckResponse = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(TrackerError::Api(
                response.error.unwrap_or_else(|| "stop rejected".to_string()),
            ))
        }
    }

    /// Upload a GPX track file; returns the parsed samples for replay.
    pub async fn upload_gpx(&self, filename: &str, bytes: Vec<u8>) -> Result<Vec<TrackSample>> {
        let url = format!("{}/ride/upload-gpx", self.base_url);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("gpx_file", part);

        let response: GpxUploadResponse = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(TrackerError::Api(
                response.error.unwrap_or_else(|| "GPX upload rejected".to_string()),
            ));
        }

        tracing::info!(
            count = response.count.unwrap_or(response.points.len()),
            "GPX track uploaded"
        );
        Ok(response.points)
    }
}

fn validate_start(response: StartRideResponse) -> Result<i64> {
    match response {
        StartRideResponse {
            success: true,
            ride_id: Some(id),
            ..
        } if id > 0 => Ok(id),
        StartRideResponse {
            error: Some(reason),
            ..
        } => Err(TrackerError::Api(reason)),
        response => Err(TrackerError::Api(format!(
            "bad start response: success={}, ride_id={:?}",
            response.success, response.ride_id
        ))),
    }
}
