// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride session tracker.
//!
//! Owns the session state machine (`Idle -> Recording ->
//! AwaitingConfirmation -> Idle`), the GPS ingestion pipeline, and the
//! running statistics. UI start/stop actions drive the session; the session
//! gates ingestion; every accepted point updates the statistics and is
//! forwarded to the backend best-effort.

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::{GpsFix, GpsPoint, RideSession, RideStats, SessionStatus, TrackSample};
use crate::services::api::{RideApi, RideMetadata, RidePhoto};
use crate::services::sensor::{LocationSensor, LocationWatch, SensorError};
use crate::storage::SessionStorage;

/// Map viewport instruction for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapAction {
    /// Tight zoom-in on an early, accurate position.
    ZoomTo { latitude: f64, longitude: f64 },
    /// Re-center at the current zoom level.
    Recenter { latitude: f64, longitude: f64 },
}

/// What the presentation layer should do after one ingested fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixOutcome {
    pub map_action: MapAction,
    /// True when the high-speed heuristic wants a "start recording?" prompt.
    pub prompt_start: bool,
}

/// Result of a track replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    /// Points acknowledged by the backend before the replay ended.
    pub sent: usize,
    pub total: usize,
}

/// The ride session tracker.
pub struct RideTracker {
    config: Config,
    api: RideApi,
    storage: Box<dyn SessionStorage>,
    sensor: Box<dyn LocationSensor>,

    session: RideSession,
    /// Stop was requested; waiting for finalize or cancel.
    pending_stop: bool,

    points: Vec<GpsPoint>,
    route: Vec<(f64, f64)>,
    stats: RideStats,

    watch: Option<LocationWatch>,
    last_prompt: Option<Instant>,
}

impl RideTracker {
    pub fn new(
        config: Config,
        api: RideApi,
        storage: Box<dyn SessionStorage>,
        sensor: Box<dyn LocationSensor>,
    ) -> Self {
        Self {
            config,
            api,
            storage,
            sensor,
            session: RideSession::empty(),
            pending_stop: false,
            points: Vec::new(),
            route: Vec::new(),
            stats: RideStats::default(),
            watch: None,
            last_prompt: None,
        }
    }

    // ── Session state machine ───────────────────────────────────────

    /// Start recording a new ride.
    ///
    /// On a validated backend acknowledgment, atomically installs the new
    /// session, clears the point buffer, persists, and (re)starts GPS
    /// tracking. Any rejected or malformed response leaves the store
    /// untouched.
    pub async fn start(&mut self, bike_id: Option<&str>) -> Result<i64> {
        if self.session.recording {
            return Err(TrackerError::AlreadyRecording);
        }

        let ride_id = self.api.start_ride(bike_id).await?;

        self.session = RideSession::begin(ride_id, Utc::now());
        self.pending_stop = false;
        self.points.clear();
        self.route.clear();
        self.stats = RideStats::default();
        self.persist();

        tracing::info!(ride_id, "Ride started");
        self.start_gps_tracking();
        Ok(ride_id)
    }

    /// Request a stop: tear down GPS, enter AwaitingConfirmation, and return
    /// the summary snapshot for the confirmation dialog.
    ///
    /// If the in-memory id was lost (e.g. after a reload), one recovery from
    /// durable storage is attempted first. State is not cleared here; that
    /// happens only on a confirmed [`finalize`](Self::finalize).
    pub fn stop(&mut self) -> Result<RideStats> {
        if self.session.ride_id.is_none() {
            self.restore();
        }
        if self.session.ride_id.is_none() {
            return Err(TrackerError::NoActiveRide);
        }
        if !self.session.recording {
            tracing::warn!("Stop requested with recording flag off; proceeding with ride id");
        }

        self.stop_gps_tracking();
        self.pending_stop = true;
        self.refresh_stats();
        Ok(self.stats.clone())
    }

    /// Submit the accumulated trip with its metadata.
    ///
    /// Success clears the whole session, buffers and durable storage.
    /// Failure leaves everything intact so the user can retry.
    pub async fn finalize(
        &mut self,
        metadata: RideMetadata,
        photos: Vec<RidePhoto>,
    ) -> Result<()> {
        let Some(ride_id) = self.session.ride_id else {
            return Err(TrackerError::NoActiveRide);
        };

        self.api.stop_ride(ride_id, &metadata, photos).await?;

        tracing::info!(ride_id, distance_km = self.stats.distance_km, "Ride saved");
        self.session = RideSession::empty();
        self.pending_stop = false;
        self.points.clear();
        self.route.clear();
        self.stats = RideStats::default();
        self.last_prompt = None;
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "Failed to clear persisted session");
        }
        Ok(())
    }

    /// Discard a pending stop confirmation. If the ride is still recording
    /// and the GPS watch was torn down by [`stop`](Self::stop), ingestion
    /// resumes.
    pub fn cancel(&mut self) {
        self.pending_stop = false;
        if self.session.recording && self.watch.is_none() {
            tracing::info!("Stop cancelled; resuming GPS tracking");
            self.start_gps_tracking();
        }
    }

    /// Restore the session from durable storage.
    ///
    /// Only a record with a positive id and the recording flag re-enters
    /// Recording; anything else (including unreadable records) is purged so
    /// a half-written reload can never show a recording UI with no ride to
    /// stop.
    pub fn restore(&mut self) -> SessionStatus {
        match self.storage.load() {
            Ok(Some(record)) if record.is_restorable() => {
                tracing::info!(ride_id = ?record.ride_id, "Session restored from storage");
                self.session = record;
            }
            Ok(Some(_)) => {
                tracing::warn!("Stale session record without a ride id; purging");
                self.purge();
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Unreadable session record; purging");
                self.purge();
            }
        }
        self.status()
    }

    /// Persist the session triple. Durability is best-effort: a failed write
    /// is logged, the in-memory session stays authoritative.
    fn persist(&mut self) {
        if let Err(err) = self.storage.save(&self.session) {
            tracing::warn!(error = %err, "Failed to persist session state");
        }
    }

    fn purge(&mut self) {
        self.session = RideSession::empty();
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "Failed to purge session storage");
        }
    }

    // ── GPS ingestion ───────────────────────────────────────────────

    /// Ingest one location fix.
    ///
    /// The fix is buffered, the statistics refreshed, and (while recording)
    /// the point forwarded to the backend fire-and-forget. Returns the map
    /// and prompt instructions for the presentation layer.
    pub fn handle_fix(&mut self, fix: GpsFix) -> FixOutcome {
        let accuracy = fix.accuracy_m;
        if accuracy > self.config.accuracy_warn_m {
            // TODO: decide whether poor fixes should be excluded from the
            // distance/speed aggregates; today they are warned about but
            // still admitted.
            tracing::warn!(accuracy_m = accuracy, "Poor GPS accuracy; point kept");
        }

        let point = GpsPoint::from_fix(&fix, Utc::now().timestamp());
        self.points.push(point.clone());
        self.route.push((point.latitude, point.longitude));

        let n = self.points.len();
        let map_action = if n == 1 || (n <= 3 && accuracy <= self.config.accuracy_warn_m) {
            MapAction::ZoomTo {
                latitude: point.latitude,
                longitude: point.longitude,
            }
        } else {
            MapAction::Recenter {
                latitude: point.latitude,
                longitude: point.longitude,
            }
        };

        self.refresh_stats();

        let prompt_start = self.should_prompt(point.speed_kmh);

        if self.session.recording {
            if let Some(ride_id) = self.session.ride_id {
                self.api.forward_point(ride_id, point);
            }
        }

        FixOutcome {
            map_action,
            prompt_start,
        }
    }

    /// High-speed heuristic: prompt to start recording when moving fast
    /// while idle, at most once per cooldown interval.
    fn should_prompt(&mut self, speed_kmh: f64) -> bool {
        if self.session.recording || speed_kmh <= self.config.speed_threshold_kmh {
            return false;
        }
        let cooldown = Duration::from_millis(self.config.prompt_cooldown_ms);
        let now = Instant::now();
        match self.last_prompt {
            Some(last) if now.duration_since(last) < cooldown => false,
            _ => {
                self.last_prompt = Some(now);
                true
            }
        }
    }

    /// Drive the current GPS watch until it ends or is torn down.
    pub async fn run_gps(&mut self) {
        loop {
            let event = match self.watch.as_mut() {
                Some(watch) => watch.recv().await,
                None => return,
            };
            match event {
                Some(Ok(fix)) => {
                    let outcome = self.handle_fix(fix);
                    if outcome.prompt_start {
                        tracing::info!("High speed while idle; start-recording prompt requested");
                    }
                }
                Some(Err(err)) => self.handle_sensor_error(err),
                None => {
                    self.watch = None;
                    return;
                }
            }
        }
    }

    fn handle_sensor_error(&mut self, err: SensorError) {
        match err {
            SensorError::Timeout => {
                tracing::warn!("GPS timeout; ride continues without location updates");
            }
            SensorError::PermissionDenied | SensorError::Unavailable => {
                tracing::warn!(error = %err, "Live tracking disabled; recording session continues");
                self.stop_gps_tracking();
            }
        }
    }

    /// (Re)subscribe to the location sensor, always tearing down any
    /// previous watch first so stale subscriptions can't layer up.
    fn start_gps_tracking(&mut self) {
        if self.watch.take().is_some() {
            tracing::debug!("Cleared previous GPS watch");
        }
        match self.sensor.subscribe() {
            Ok(watch) => self.watch = Some(watch),
            Err(err) => {
                tracing::warn!(error = %err, "Geolocation unavailable; recording continues without GPS");
            }
        }
    }

    fn stop_gps_tracking(&mut self) {
        if self.watch.take().is_some() {
            tracing::debug!("GPS watch stopped");
        }
    }

    // ── Track replay ────────────────────────────────────────────────

    /// Replay an imported track as if its samples were live fixes.
    ///
    /// With no active session, one is auto-started first (a failed start
    /// aborts the replay). Each sample gets one synthesized plausible speed
    /// used for both the wire payload and the local buffer, and sends are
    /// paced by the configured interval. A rejected point halts the replay;
    /// the report carries the partial count.
    pub async fn replay_track(&mut self, samples: &[TrackSample]) -> Result<ReplayReport> {
        if self.session.ride_id.is_none() {
            self.restore();
        }
        if self.session.ride_id.is_none() {
            tracing::info!("No active ride; auto-starting for replay");
            self.start(None).await?;
        }
        let Some(ride_id) = self.session.ride_id else {
            return Err(TrackerError::NoActiveRide);
        };
        if !self.session.recording {
            tracing::warn!(ride_id, "Recording flag off; replaying with ride id anyway");
        }

        tracing::info!(ride_id, points = samples.len(), "Replaying track");

        // The full route is shown immediately; the buffer fills per ack.
        self.route = samples.iter().map(|s| (s.lat, s.lon)).collect();

        let base_timestamp = Utc::now().timestamp();
        let mut sent = 0;
        for (index, sample) in samples.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.replay_interval_ms)).await;
            }

            let point = GpsPoint {
                latitude: sample.lat,
                longitude: sample.lon,
                speed_kmh: rand::rng().random_range(25.0..40.0),
                altitude: Some(sample.ele.unwrap_or(0.0)),
                timestamp: base_timestamp + index as i64,
                accuracy_m: None,
            };

            match self.api.add_gps_point(ride_id, &point).await {
                Ok(()) => {
                    self.points.push(point);
                    self.refresh_stats();
                    sent += 1;
                }
                Err(err) => {
                    tracing::warn!(index, error = %err, "Replay halted on rejected point");
                    break;
                }
            }
        }

        tracing::info!(sent, total = samples.len(), "Replay finished");
        Ok(ReplayReport {
            sent,
            total: samples.len(),
        })
    }

    // ── Read accessors for the presentation layer ───────────────────

    pub fn status(&self) -> SessionStatus {
        if self.pending_stop && self.session.ride_id.is_some() {
            SessionStatus::AwaitingConfirmation
        } else if self.session.recording {
            SessionStatus::Recording
        } else {
            SessionStatus::Idle
        }
    }

    pub fn session(&self) -> &RideSession {
        &self.session
    }

    pub fn stats(&self) -> &RideStats {
        &self.stats
    }

    /// Ordered map route, chronological.
    pub fn route(&self) -> &[(f64, f64)] {
        &self.route
    }

    /// The in-memory point buffer for the active session.
    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    /// Whether a live GPS watch is attached.
    pub fn gps_active(&self) -> bool {
        self.watch.is_some()
    }

    fn refresh_stats(&mut self) {
        let now = Utc::now();
        let started_at = self.session.started_at.unwrap_or(now);
        self.stats = RideStats::compute(&self.points, started_at, now);
    }
}
