// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MotoLog ride tracker core.
//!
//! Records GPS-based motorcycle rides against the MotoLog backend: a session
//! state machine persisted across restarts, a location ingestion pipeline
//! (live fixes or replayed GPX tracks), and an incremental ride statistics
//! engine. The presentation layer (map, buttons, modals) lives elsewhere and
//! talks to [`services::RideTracker`] through its status/stats/route
//! accessors.

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod services;
pub mod storage;
pub mod time_utils;

pub use config::Config;
pub use error::{Result, TrackerError};
