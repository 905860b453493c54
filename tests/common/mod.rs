// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: an in-process mock ride backend and tracker builders.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use motolog_tracker::config::Config;
use motolog_tracker::services::{ChannelSensor, RideApi, RideTracker};
use motolog_tracker::storage::MemoryStorage;

/// One call observed by the mock backend.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Start { at: Instant },
    AddPoint { ride_id: i64, at: Instant },
    Stop { at: Instant },
}

#[derive(Debug)]
pub struct BackendState {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub start_response: Mutex<Value>,
    pub fail_stop: Mutex<bool>,
    pub fail_add_point: Mutex<bool>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            start_response: Mutex::new(json!({"success": true, "ride_id": 42})),
            fail_stop: Mutex::new(false),
            fail_add_point: Mutex::new(false),
        }
    }
}

/// Mock ride backend on an ephemeral local port, recording every call.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/ride/start", post(handle_start))
            .route("/api/ride/add-gps-point", post(handle_add_point))
            .route("/api/ride/stop", post(handle_stop))
            .route("/api/ride/upload-gpx", post(handle_upload_gpx))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    #[allow(dead_code)]
    pub fn set_start_response(&self, response: Value) {
        *self.state.start_response.lock().unwrap() = response;
    }

    #[allow(dead_code)]
    pub fn set_fail_stop(&self, fail: bool) {
        *self.state.fail_stop.lock().unwrap() = fail;
    }

    #[allow(dead_code)]
    pub fn set_fail_add_point(&self, fail: bool) {
        *self.state.fail_add_point.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn start_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Start { .. }))
            .count()
    }

    /// `(ride_id, arrival instant)` for each recorded add-gps-point call.
    #[allow(dead_code)]
    pub fn add_point_calls(&self) -> Vec<(i64, Instant)> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::AddPoint { ride_id, at } => Some((*ride_id, *at)),
                _ => None,
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn stop_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Stop { .. }))
            .count()
    }
}

async fn handle_start(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state
        .calls
        .lock()
        .unwrap()
        .push(RecordedCall::Start { at: Instant::now() });
    Json(state.start_response.lock().unwrap().clone())
}

async fn handle_add_point(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let ride_id = body["ride_id"].as_i64().unwrap_or(0);
    state.calls.lock().unwrap().push(RecordedCall::AddPoint {
        ride_id,
        at: Instant::now(),
    });
    if *state.fail_add_point.lock().unwrap() {
        Json(json!({"success": false, "error": "db write failed"}))
    } else {
        Json(json!({"success": true}))
    }
}

async fn handle_stop(State(state): State<Arc<BackendState>>) -> Json<Value> {
    state
        .calls
        .lock()
        .unwrap()
        .push(RecordedCall::Stop { at: Instant::now() });
    if *state.fail_stop.lock().unwrap() {
        Json(json!({"success": false, "error": "could not save ride"}))
    } else {
        Json(json!({"success": true}))
    }
}

async fn handle_upload_gpx(State(_state): State<Arc<BackendState>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "count": 3,
        "points": [
            {"lat": 42.6955, "lon": 23.3322, "ele": 550.0},
            {"lat": 42.6960, "lon": 23.3330},
            {"lat": 42.6965, "lon": 23.3340, "ele": 552.0},
        ]
    }))
}

/// Tracker wired to the mock backend with shared in-memory storage and a
/// channel sensor. Returns the sensor and storage handles for the test.
#[allow(dead_code)]
pub fn tracker_with(backend: &MockBackend, mut config: Config) -> (RideTracker, ChannelSensor, MemoryStorage) {
    config.backend_url = backend.base_url.clone();
    let sensor = ChannelSensor::new();
    let storage = MemoryStorage::new();
    let api = RideApi::new(config.backend_url.clone());
    let tracker = RideTracker::new(
        config,
        api,
        Box::new(storage.clone()),
        Box::new(sensor.clone()),
    );
    (tracker, sensor, storage)
}

#[allow(dead_code)]
pub fn test_tracker(backend: &MockBackend) -> (RideTracker, ChannelSensor, MemoryStorage) {
    tracker_with(backend, Config::default())
}

/// Give spawned fire-and-forget forwards time to reach the mock backend.
#[allow(dead_code)]
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}

/// A live fix with the given speed (km/h) and accuracy.
#[allow(dead_code)]
pub fn fix(lat: f64, lon: f64, speed_kmh: f64, accuracy_m: f64) -> motolog_tracker::models::GpsFix {
    motolog_tracker::models::GpsFix {
        latitude: lat,
        longitude: lon,
        speed_ms: Some(speed_kmh / 3.6),
        altitude: None,
        accuracy_m,
    }
}
