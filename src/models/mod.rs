// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the ride tracker.

pub mod point;
pub mod session;
pub mod stats;

pub use point::{GpsFix, GpsPoint, TrackSample};
pub use session::{RideSession, SessionStatus};
pub use stats::RideStats;
