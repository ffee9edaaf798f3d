//! State persistence adapters.

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;

use chronicle_core::WorldState;

/// Contract for loading and saving the canonical world state.
///
/// No business rules live here: the store round-trips whatever state the
/// engine produced. Implementations must make `save` atomic — a reader never
/// observes a partially written document.
pub trait StateStore: Send + Sync {
    /// Loads the persisted state, or a default world when none exists yet.
    fn load(&self) -> Result<WorldState>;

    /// Persists the state, replacing the previous document atomically.
    fn save(&self, state: &WorldState) -> Result<()>;
}
