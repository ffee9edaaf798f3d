//! In-memory StateStore implementation for tests and ephemeral sessions.

use std::sync::Mutex;

use chronicle_core::WorldState;

use super::{Result, StateStore, StoreError};

/// Mutex-guarded store holding the world in process memory.
#[derive(Default)]
pub struct InMemoryStateStore {
    state: Mutex<WorldState>,
}

impl InMemoryStateStore {
    pub fn new(state: WorldState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self) -> Result<WorldState> {
        let guard = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &WorldState) -> Result<()> {
        let mut guard = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        *guard = state.clone();
        Ok(())
    }
}
