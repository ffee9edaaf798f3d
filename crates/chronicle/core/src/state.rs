//! Authoritative world state representation.
//!
//! This module owns the data structures that describe characters, items, and
//! the event timeline. Runtime layers clone or query this state but mutate it
//! exclusively through the engine. The persisted schema has grown additively
//! before (the event log was a later addition), so every record keeps unknown
//! fields in a flattened map and decodes missing fields to defaults instead
//! of rejecting the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved id for the human actor. The player character may be absent from
/// `characters` until the first accepted `move` creates it.
pub const PLAYER_ID: &str = "player";

/// Bounded disposition score toward the player.
///
/// Saturates at the `[-100, 100]` range: arithmetic clamps after adding and
/// never wraps or errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Affinity(i32);

impl Affinity {
    pub const MIN: Affinity = Affinity(-100);
    pub const MAX: Affinity = Affinity(100);

    /// Sentinel stored on the lazily created player character. Not a
    /// relationship score with anyone else.
    pub const SELF: Affinity = Affinity(100);

    /// Builds an affinity clamped into the valid range.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Adds `delta` and clamps the result into `[-100, 100]`.
    pub fn saturating_add(self, delta: i32) -> Self {
        Self::new(self.0.saturating_add(delta))
    }
}

/// A named inhabitant of the world.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Once false the character is permanently excluded from interactive
    /// targeting; nothing in the engine flips it back.
    #[serde(default = "default_alive")]
    pub alive: bool,

    /// Free-form place identifier.
    #[serde(default)]
    pub location: String,

    /// The only numeric channel actions influence.
    #[serde(default)]
    pub affinity_to_player: Affinity,

    /// Unknown fields preserved across a round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_alive() -> bool {
    true
}

impl Character {
    pub fn new(location: impl Into<String>, affinity_to_player: Affinity) -> Self {
        Self {
            alive: true,
            location: location.into(),
            affinity_to_player,
            extra: Map::new(),
        }
    }
}

/// A possessable object. Ownership transfer is its only mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Character id of the current owner, if any. At most one at a time.
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn owned_by(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            extra: Map::new(),
        }
    }
}

/// An immutable timeline marker recorded by an accepted action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique across the lifetime of the world (validator-enforced).
    pub id: String,

    /// World time *after* the action that produced this event was applied.
    #[serde(default)]
    pub time: u64,

    /// Action type that recorded the event. Provenance only, never consulted
    /// by validation.
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub actor: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical snapshot of the mutable world.
///
/// Read at the start of a request, transformed at most once into a fresh
/// value, and persisted at the end. Never mutated in place between requests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Monotonically non-decreasing counter, advanced by exactly 1 per
    /// accepted action.
    #[serde(default)]
    pub time: u64,

    /// Stable identities; no two characters share an id.
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,

    #[serde(default)]
    pub items: BTreeMap<String, Item>,

    /// Append-only; insertion order is chronological order.
    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorldState {
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Whether the event id has already been recorded on the timeline.
    pub fn has_event(&self, id: &str) -> bool {
        self.events.iter().any(|event| event.id == id)
    }
}
