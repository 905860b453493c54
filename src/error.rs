// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types surfaced to the presentation layer.

/// Tracker error type.
///
/// Validation errors (rejected backend responses) and state-consistency
/// errors abort the operation and leave the session untouched; transient
/// point-forward failures never reach this type (they are logged and
/// swallowed at the forwarding site).
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The backend answered, but with an explicit failure or a malformed
    /// payload. Carries the server-supplied reason when present.
    #[error("Backend error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Stop/finalize/replay was invoked with no recoverable ride id.
    #[error("No active ride; did you start one?")]
    NoActiveRide,

    /// `start` was called while a ride is already being recorded.
    #[error("A ride is already being recorded")]
    AlreadyRecording,

    #[error("State storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
