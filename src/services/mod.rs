// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend client, sensor abstraction, and the tracker.

pub mod api;
pub mod sensor;
pub mod tracker;

pub use api::{RideApi, RideMetadata, RidePhoto};
pub use sensor::{ChannelSensor, LocationSensor, LocationWatch, SensorError, SensorEvent};
pub use tracker::{FixOutcome, MapAction, ReplayReport, RideTracker};
