//! The deterministic state-transition function.
//!
//! [`apply`] computes the successor world for a validator-accepted action.
//! It never mutates its input: the caller keeps the old snapshot, and the
//! returned value shares no aliasing with it. Calling it on a rejected pair
//! is a caller bug; the function itself stays total and silently skips
//! effects whose preconditions the validator would have caught.

use serde_json::Map;

use crate::action::{Action, ActionKind};
use crate::state::{Affinity, Character, Event, PLAYER_ID, WorldState};

/// Substrings of a `talk` intent that read as offering help or protection in
/// the setting's language. A match nudges the target's affinity upward.
const GOODWILL_KEYWORDS: [&str; 5] = ["救", "帮", "保护", "助", "援"];

const TALK_GOODWILL_BONUS: i32 = 10;
const ATTACK_PENALTY: i32 = -20;
const RESCUE_BONUS: i32 = 30;

/// Computes the successor state for an accepted `(state, action)` pair.
///
/// Every action advances `time` by exactly 1. Affinity arithmetic saturates
/// at the `[-100, 100]` bounds. `alive` is never flipped here: death is a
/// narrative fact set outside the engine.
pub fn apply(state: &WorldState, action: &Action) -> WorldState {
    let mut next = state.clone();
    next.time += 1;

    match action.kind {
        ActionKind::Move => {
            if let Some(destination) = action.destination() {
                if action.actor == PLAYER_ID && !next.characters.contains_key(PLAYER_ID) {
                    // The player character materializes on its first move.
                    next.characters.insert(
                        PLAYER_ID.to_string(),
                        Character::new(destination, Affinity::SELF),
                    );
                } else if let Some(actor) = next.characters.get_mut(&action.actor) {
                    actor.location = destination.to_string();
                }
            }
        }
        ActionKind::GiveItem => {
            if let (Some(item_id), Some(target)) = (action.item_id(), action.target_id())
                && let Some(item) = next.items.get_mut(item_id)
            {
                item.owner = Some(target.to_string());
            }
        }
        ActionKind::Talk => {
            if let Some(target) = action.target_id()
                && let Some(character) = next.characters.get_mut(target)
                && reads_as_goodwill(&action.intent)
            {
                character.affinity_to_player =
                    character.affinity_to_player.saturating_add(TALK_GOODWILL_BONUS);
            }
        }
        ActionKind::Attack => {
            if let Some(target) = action.target_id()
                && let Some(character) = next.characters.get_mut(target)
            {
                character.affinity_to_player =
                    character.affinity_to_player.saturating_add(ATTACK_PENALTY);
            }
        }
        ActionKind::Rescue => {
            if let Some(target) = action.target_id()
                && let Some(character) = next.characters.get_mut(target)
            {
                character.affinity_to_player =
                    character.affinity_to_player.saturating_add(RESCUE_BONUS);
            }
        }
    }

    if let Some(event_id) = action.event_id() {
        next.events.push(Event {
            id: event_id.to_string(),
            time: next.time,
            kind: action.kind.as_snake_case().to_string(),
            actor: action.actor.clone(),
            extra: Map::new(),
        });
    }

    next
}

fn reads_as_goodwill(intent: &str) -> bool {
    let lowered = intent.to_lowercase();
    GOODWILL_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
