// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Every knob has a default matching the shipped behavior, so a bare
//! environment gives a working tracker pointed at a local backend.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the ride backend, e.g. `http://localhost:8080/api`.
    pub backend_url: String,
    /// Path of the durable session record (the reload-survival state).
    pub state_path: String,
    /// Speed above which a "start recording?" prompt fires while idle (km/h).
    pub speed_threshold_kmh: f64,
    /// Minimum interval between two prompts (milliseconds).
    pub prompt_cooldown_ms: u64,
    /// Pacing between replayed track points (milliseconds).
    pub replay_interval_ms: u64,
    /// Horizontal accuracy above which a fix is logged as poor (meters).
    pub accuracy_warn_m: f64,
}

impl Default for Config {
    /// Default config, also used by tests.
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080/api".to_string(),
            state_path: "motolog_ride_state.json".to_string(),
            speed_threshold_kmh: 9.0,
            prompt_cooldown_ms: 5_000,
            replay_interval_ms: 50,
            accuracy_warn_m: 100.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present. Unset or unparseable values fall back
    /// to the defaults above.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            backend_url: env::var("MOTOLOG_BACKEND_URL").unwrap_or(defaults.backend_url),
            state_path: env::var("MOTOLOG_STATE_PATH").unwrap_or(defaults.state_path),
            speed_threshold_kmh: env_parse("MOTOLOG_SPEED_THRESHOLD_KMH", defaults.speed_threshold_kmh),
            prompt_cooldown_ms: env_parse("MOTOLOG_PROMPT_COOLDOWN_MS", defaults.prompt_cooldown_ms),
            replay_interval_ms: env_parse("MOTOLOG_REPLAY_INTERVAL_MS", defaults.replay_interval_ms),
            accuracy_warn_m: env_parse("MOTOLOG_ACCURACY_WARN_M", defaults.accuracy_warn_m),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
