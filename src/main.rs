// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MotoLog replay driver.
//!
//! Uploads a GPX track to the backend, replays the parsed points as a
//! recorded ride, and prints the trip summary.

use anyhow::Context;
use motolog_tracker::config::Config;
use motolog_tracker::services::{ChannelSensor, RideApi, RideMetadata, RideTracker};
use motolog_tracker::storage::FileStorage;
use motolog_tracker::time_utils::format_elapsed;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env();
    tracing::info!(backend = %config.backend_url, "Starting MotoLog replay driver");

    let gpx_path = std::env::args()
        .nth(1)
        .context("usage: motolog-tracker <track.gpx>")?;
    let bytes = std::fs::read(&gpx_path).with_context(|| format!("reading {}", gpx_path))?;
    let filename = std::path::Path::new(&gpx_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("track.gpx")
        .to_string();

    let api = RideApi::new(config.backend_url.clone());
    let storage = Box::new(FileStorage::new(&config.state_path));
    let sensor = Box::new(ChannelSensor::new());
    let mut tracker = RideTracker::new(config, api.clone(), storage, sensor);
    tracker.restore();

    let samples = api.upload_gpx(&filename, bytes).await?;
    let report = tracker.replay_track(&samples).await?;

    let stats = tracker.stats().clone();
    println!("Replayed {}/{} points", report.sent, report.total);
    println!("Distance:  {:.2} km", stats.distance_km);
    println!("Avg speed: {:.1} km/h", stats.avg_kmh);
    println!("Top speed: {:.1} km/h", stats.top_kmh);
    println!("Elapsed:   {}", format_elapsed(stats.elapsed_secs));

    tracker
        .stop()
        .context("stopping replayed ride")?;
    tracker
        .finalize(
            RideMetadata {
                title: format!("Replayed: {}", filename),
                description: String::new(),
                public: false,
            },
            Vec::new(),
        )
        .await
        .context("saving replayed ride")?;
    println!("Ride saved.");

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
