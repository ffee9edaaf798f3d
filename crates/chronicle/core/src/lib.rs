//! Deterministic narrative-state rules shared across the runtime and tools.
//!
//! `chronicle-core` defines the canonical world model (characters, items,
//! events) and the pure legality/transition functions over it. All state
//! mutation flows through [`engine::execute`]; the runtime layer owns
//! persistence and the narration collaborators and never touches world fields
//! directly.
pub mod action;
pub mod apply;
pub mod engine;
pub mod state;
pub mod validate;

pub use action::{Action, ActionKind, MalformedAction};
pub use apply::apply;
pub use engine::execute;
pub use state::{Affinity, Character, Event, Item, WorldState, PLAYER_ID};
pub use validate::{Rejection, validate};
