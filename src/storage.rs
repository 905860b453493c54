// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable session storage.
//!
//! One record under a fixed location holding the `{ride_id, recording,
//! started_at}` triple, read on process start and written after every
//! session mutation. Point buffers are never persisted.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Result, TrackerError};
use crate::models::RideSession;

/// Durable store for the session record.
pub trait SessionStorage: Send {
    /// Read the persisted record, if any.
    fn load(&self) -> Result<Option<RideSession>>;
    /// Write the record, replacing any previous one.
    fn save(&self, session: &RideSession) -> Result<()>;
    /// Remove the record.
    fn clear(&self) -> Result<()>;
}

/// JSON-file-backed storage at a configured path.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<RideSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TrackerError::Storage(err.to_string())),
        };
        let session = serde_json::from_str(&raw)
            .map_err(|err| TrackerError::Storage(format!("corrupt session record: {}", err)))?;
        Ok(Some(session))
    }

    fn save(&self, session: &RideSession) -> Result<()> {
        let raw = serde_json::to_string(session)
            .map_err(|err| TrackerError::Storage(err.to_string()))?;
        // Write via temp file + rename so a crash can't leave a torn record.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|err| TrackerError::Storage(err.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|err| TrackerError::Storage(err.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TrackerError::Storage(err.to_string())),
        }
    }
}

/// In-memory storage for tests (offline mock).
///
/// Clones share the same record, so a test can hand one clone to a tracker
/// and inspect or reuse the other.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<RideSession>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<RideSession>> {
        Ok(self
            .record
            .lock()
            .map_err(|_| TrackerError::Storage("poisoned lock".to_string()))?
            .clone())
    }

    fn save(&self, session: &RideSession) -> Result<()> {
        *self
            .record
            .lock()
            .map_err(|_| TrackerError::Storage("poisoned lock".to_string()))? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .record
            .lock()
            .map_err(|_| TrackerError::Storage("poisoned lock".to_string()))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());

        let session = RideSession::begin(42, Utc::now());
        storage.save(&session).unwrap();
        assert_eq!(storage.load().unwrap(), Some(session));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clones_share_record() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.save(&RideSession::begin(7, Utc::now())).unwrap();
        assert_eq!(other.load().unwrap().unwrap().ride_id, Some(7));
    }
}
