// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location-sensor event source.
//!
//! Models the platform geolocation API as a subscription yielding a stream
//! of fixes and sensor errors. Dropping the [`LocationWatch`] is the
//! unsubscribe; the tracker tears a watch down and creates a fresh one on
//! every (re)start so a stale subscription can never deliver duplicate
//! callbacks.

use tokio::sync::mpsc;

use crate::models::GpsFix;

/// Sensor failure modes, mirroring the platform error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location sensor unavailable")]
    Unavailable,
    #[error("location fix timed out")]
    Timeout,
}

/// One event delivered on a watch: a fix, or a sensor error.
pub type SensorEvent = std::result::Result<GpsFix, SensorError>;

/// Handle to an active location subscription.
pub struct LocationWatch {
    rx: mpsc::UnboundedReceiver<SensorEvent>,
}

impl LocationWatch {
    pub fn new(rx: mpsc::UnboundedReceiver<SensorEvent>) -> Self {
        Self { rx }
    }

    /// Next sensor event; `None` once the sensor side has gone away.
    pub async fn recv(&mut self) -> Option<SensorEvent> {
        self.rx.recv().await
    }
}

/// A source of location subscriptions.
pub trait LocationSensor: Send {
    /// Open a fresh subscription. May fail outright when the platform has
    /// no location support at all.
    fn subscribe(&mut self) -> std::result::Result<LocationWatch, SensorError>;
}

/// Channel-backed sensor for replay drivers and tests.
///
/// Each `subscribe` opens a fresh channel and implicitly invalidates the
/// previous one (its receiver is dropped by the tracker, so sends into it
/// fail). Clones share the same current channel.
#[derive(Clone, Default)]
pub struct ChannelSensor {
    tx: std::sync::Arc<std::sync::Mutex<Option<mpsc::UnboundedSender<SensorEvent>>>>,
}

impl ChannelSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event into the current subscription.
    ///
    /// Returns false when no live watch exists (not subscribed, or the
    /// watch was torn down).
    pub fn send(&self, event: SensorEvent) -> bool {
        match self.tx.lock() {
            Ok(guard) => guard
                .as_ref()
                .is_some_and(|tx| tx.send(event).is_ok()),
            Err(_) => false,
        }
    }

    /// Whether a watch is currently attached and listening.
    pub fn is_attached(&self) -> bool {
        self.tx
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|tx| !tx.is_closed()))
            .unwrap_or(false)
    }
}

impl LocationSensor for ChannelSensor {
    fn subscribe(&mut self) -> std::result::Result<LocationWatch, SensorError> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut guard) = self.tx.lock() {
            *guard = Some(tx);
        }
        Ok(LocationWatch::new(rx))
    }
}
