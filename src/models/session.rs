// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The active recording context and its lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and lifecycle flag of the currently recorded ride.
///
/// This exact triple is what gets persisted to durable storage on every
/// mutation; the point buffer is deliberately not part of it.
///
/// Invariant: `recording == true` implies `ride_id` is a positive id. A
/// record violating this is treated as corrupt and purged on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSession {
    /// Backend-issued ride identifier; `None` when no ride is active.
    pub ride_id: Option<i64>,
    /// True between a successful start acknowledgment and finalize.
    pub recording: bool,
    /// Local start time, used only for elapsed-time display.
    pub started_at: Option<DateTime<Utc>>,
}

impl RideSession {
    /// The empty (idle) session.
    pub fn empty() -> Self {
        Self {
            ride_id: None,
            recording: false,
            started_at: None,
        }
    }

    /// Session for a freshly acknowledged ride.
    pub fn begin(ride_id: i64, started_at: DateTime<Utc>) -> Self {
        Self {
            ride_id: Some(ride_id),
            recording: true,
            started_at: Some(started_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ride_id.is_none() && !self.recording && self.started_at.is_none()
    }

    /// Whether a restored record may re-enter Recording.
    ///
    /// Requires both a positive id and the recording flag. A half-written
    /// record (flag set, id missing) must not resurrect a "recording" UI
    /// with no ride to stop.
    pub fn is_restorable(&self) -> bool {
        self.ride_id.is_some_and(|id| id > 0) && self.recording
    }
}

impl Default for RideSession {
    fn default() -> Self {
        Self::empty()
    }
}

/// Session status exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Recording,
    /// Stopped, waiting for the user to confirm (finalize) or cancel.
    AwaitingConfirmation,
}
