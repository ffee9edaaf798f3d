//! File-based StateStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use chronicle_core::WorldState;

use super::{Result, StateStore, StoreError};

/// Stores the world as a single pretty-printed JSON document.
///
/// # Durability
///
/// Saves go through a `.tmp` staging file followed by an atomic rename, so a
/// crash mid-write leaves the previous document intact and the staging
/// artifact is removed on failure. A corrupt or missing document decodes to a
/// fresh default world rather than failing the caller; the damaged bytes are
/// only reported in the log.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<WorldState> {
        if !self.path.exists() {
            tracing::debug!("no state document at {}, starting fresh", self.path.display());
            return Ok(WorldState::default());
        }

        let text = fs::read_to_string(&self.path).map_err(StoreError::Io)?;
        match serde_json::from_str(&text) {
            Ok(state) => {
                tracing::debug!("loaded state from {}", self.path.display());
                Ok(state)
            }
            Err(error) => {
                tracing::warn!(
                    "corrupt state document at {}: {error}; falling back to a fresh world",
                    self.path.display()
                );
                Ok(WorldState::default())
            }
        }
    }

    fn save(&self, state: &WorldState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(StoreError::Io)?;
        }

        let staging = self.staging_path();
        let bytes = serde_json::to_vec_pretty(state).map_err(StoreError::Json)?;

        if let Err(error) = fs::write(&staging, &bytes).and_then(|()| fs::rename(&staging, &self.path))
        {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Io(error));
        }

        tracing::debug!("saved state (time {}) to {}", state.time, self.path.display());
        Ok(())
    }
}
