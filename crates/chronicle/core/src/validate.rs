//! Legality checking for proposed actions.
//!
//! [`validate`] is the heart of the engine: a pure function over
//! `(WorldState, Action)` that either accepts or names the first violated
//! rule. Rule order is a contract — callers and tests depend on *which*
//! reason comes back when several rules would fail (a dead recipient must win
//! over a non-owned item, for example), so the guards below run in a fixed
//! sequence and short-circuit on the first failure.

use crate::action::{Action, ActionKind};
use crate::state::{PLAYER_ID, WorldState};

/// Why a proposed action is illegal against the current world.
///
/// A rejection is an expected outcome, not an exceptional condition; the
/// engine never uses the error channel for business rules.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("actor {0} does not exist")]
    ActorNotFound(String),

    #[error("actor {0} is dead")]
    ActorDead(String),

    #[error("target {target} is dead, cannot {kind}")]
    TargetDead { target: String, kind: ActionKind },

    #[error("move requires to_location")]
    MissingDestination,

    #[error("give_item requires item")]
    MissingItem,

    #[error("item {0} does not exist")]
    ItemNotFound(String),

    #[error("item {item} is not owned by {actor}, current owner: {owner}")]
    ItemNotOwned {
        item: String,
        actor: String,
        owner: String,
    },

    #[error("give_item requires target")]
    MissingRecipient,

    #[error("target {0} does not exist")]
    TargetNotFound(String),

    #[error("{kind} requires target")]
    MissingTarget { kind: ActionKind },

    #[error("event {0} has already occurred")]
    EventAlreadyOccurred(String),

    #[error("event time not monotonic: last event time {last} >= next time {next}")]
    EventTimeNotMonotonic { last: u64, next: u64 },
}

/// Decides whether `action` is legal against `state`.
///
/// Pure and deterministic: no mutation, no I/O. The first failing rule wins.
pub fn validate(state: &WorldState, action: &Action) -> Result<(), Rejection> {
    // Rules 1-2: the actor must exist and be alive. The player is exempt
    // from the existence check because it is created lazily on first move.
    if action.actor != PLAYER_ID {
        match state.character(&action.actor) {
            None => return Err(Rejection::ActorNotFound(action.actor.clone())),
            Some(actor) if !actor.alive => {
                return Err(Rejection::ActorDead(action.actor.clone()));
            }
            Some(_) => {}
        }
    }

    // Rule 3: interaction types never reach a dead character. Only fires
    // when the target is set and resolves; missing targets are judged by the
    // per-kind rules below.
    if matches!(
        action.kind,
        ActionKind::Talk | ActionKind::Rescue | ActionKind::GiveItem
    ) && let Some(target) = action.target_id()
        && let Some(character) = state.character(target)
        && !character.alive
    {
        return Err(Rejection::TargetDead {
            target: target.to_string(),
            kind: action.kind,
        });
    }

    // Rule 4: a move needs somewhere to go.
    if action.kind == ActionKind::Move && action.destination().is_none() {
        return Err(Rejection::MissingDestination);
    }

    // Rule 5: give_item structural checks and the ownership chain, in order.
    if action.kind == ActionKind::GiveItem {
        let item_id = action.item_id().ok_or(Rejection::MissingItem)?;
        let item = state
            .item(item_id)
            .ok_or_else(|| Rejection::ItemNotFound(item_id.to_string()))?;
        if item.owner.as_deref() != Some(action.actor.as_str()) {
            return Err(Rejection::ItemNotOwned {
                item: item_id.to_string(),
                actor: action.actor.clone(),
                owner: item.owner.clone().unwrap_or_else(|| "none".to_string()),
            });
        }
        let target = action.target_id().ok_or(Rejection::MissingRecipient)?;
        if state.character(target).is_none() {
            return Err(Rejection::TargetNotFound(target.to_string()));
        }
    }

    // Rule 6: attack/rescue require a present, existing, living target.
    // Reinforces rule 3 for rescue and covers attack, which rule 3 skips.
    if matches!(action.kind, ActionKind::Attack | ActionKind::Rescue) {
        let target = action
            .target_id()
            .ok_or(Rejection::MissingTarget { kind: action.kind })?;
        let character = state
            .character(target)
            .ok_or_else(|| Rejection::TargetNotFound(target.to_string()))?;
        if !character.alive {
            return Err(Rejection::TargetDead {
                target: target.to_string(),
                kind: action.kind,
            });
        }
    }

    // Rule 7: timeline consistency, only when the action records an event.
    if let Some(event_id) = action.event_id() {
        if state.has_event(event_id) {
            return Err(Rejection::EventAlreadyOccurred(event_id.to_string()));
        }
        // Apply stamps the new event with time + 1. Checking only the tail is
        // sound while every event insertion funnels through apply, which
        // appends in increasing time order.
        let next_time = state.time + 1;
        if let Some(last) = state.events.last()
            && last.time >= next_time
        {
            return Err(Rejection::EventTimeNotMonotonic {
                last: last.time,
                next: next_time,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Affinity, Character, Event, Item};

    fn world() -> WorldState {
        let mut state = WorldState::default();
        state.characters.insert(
            PLAYER_ID.to_string(),
            Character::new("xu_zhou", Affinity::SELF),
        );
        state.characters.insert(
            "liu_bei".to_string(),
            Character::new("xu_zhou", Affinity::new(50)),
        );
        state.characters.insert("dead_char".to_string(), {
            let mut c = Character::new("grave", Affinity::new(0));
            c.alive = false;
            c
        });
        state
            .items
            .insert("sword_1".to_string(), Item::owned_by("liu_bei"));
        state
    }

    #[test]
    fn unknown_actor_is_rejected() {
        let action = Action::new(ActionKind::Talk, "hi").with_actor("cao_cao");
        assert_eq!(
            validate(&world(), &action),
            Err(Rejection::ActorNotFound("cao_cao".to_string()))
        );
    }

    #[test]
    fn dead_actor_cannot_act() {
        let action = Action::new(ActionKind::Move, "走")
            .with_actor("dead_char")
            .with_destination("luo_yang");
        assert_eq!(
            validate(&world(), &action),
            Err(Rejection::ActorDead("dead_char".to_string()))
        );
    }

    #[test]
    fn talking_to_the_dead_is_rejected() {
        let action = Action::new(ActionKind::Talk, "hi").with_target("dead_char");
        let rejection = validate(&world(), &action).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::TargetDead {
                target: "dead_char".to_string(),
                kind: ActionKind::Talk,
            }
        );
        assert!(rejection.to_string().contains("dead"));
    }

    #[test]
    fn move_requires_a_destination() {
        let action = Action::new(ActionKind::Move, "走");
        assert_eq!(validate(&world(), &action), Err(Rejection::MissingDestination));

        let blank = Action::new(ActionKind::Move, "走").with_destination("");
        assert_eq!(validate(&world(), &blank), Err(Rejection::MissingDestination));
    }

    #[test]
    fn give_item_requires_the_item_field() {
        let action = Action::new(ActionKind::GiveItem, "give").with_target("liu_bei");
        assert_eq!(validate(&world(), &action), Err(Rejection::MissingItem));
    }

    #[test]
    fn give_item_rejects_missing_items() {
        let action = Action::new(ActionKind::GiveItem, "give")
            .with_target("liu_bei")
            .with_item("halberd_9");
        assert_eq!(
            validate(&world(), &action),
            Err(Rejection::ItemNotFound("halberd_9".to_string()))
        );
    }

    #[test]
    fn give_item_requires_ownership_and_reports_the_owner() {
        // Scenario: sword_1 belongs to liu_bei, not the player.
        let action = Action::new(ActionKind::GiveItem, "give")
            .with_target("liu_bei")
            .with_item("sword_1");
        let rejection = validate(&world(), &action).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::ItemNotOwned {
                item: "sword_1".to_string(),
                actor: PLAYER_ID.to_string(),
                owner: "liu_bei".to_string(),
            }
        );
        assert!(rejection.to_string().contains("liu_bei"));
    }

    #[test]
    fn give_item_requires_a_recipient() {
        let mut state = world();
        state
            .items
            .insert("seal".to_string(), Item::owned_by(PLAYER_ID));
        let action = Action::new(ActionKind::GiveItem, "give").with_item("seal");
        assert_eq!(validate(&state, &action), Err(Rejection::MissingRecipient));

        let to_ghost = Action::new(ActionKind::GiveItem, "give")
            .with_item("seal")
            .with_target("zhuge_liang");
        assert_eq!(
            validate(&state, &to_ghost),
            Err(Rejection::TargetNotFound("zhuge_liang".to_string()))
        );
    }

    #[test]
    fn dead_recipient_wins_over_non_ownership() {
        // Both rule 3 and rule 5c would fire; rule 3 runs first.
        let mut state = world();
        state
            .items
            .insert("sword_2".to_string(), Item::owned_by("dead_char"));
        let action = Action::new(ActionKind::GiveItem, "give")
            .with_target("dead_char")
            .with_item("sword_2");
        assert!(matches!(
            validate(&state, &action),
            Err(Rejection::TargetDead { .. })
        ));
    }

    #[test]
    fn attack_and_rescue_need_a_living_existing_target() {
        for kind in [ActionKind::Attack, ActionKind::Rescue] {
            let missing = Action::new(kind, "x");
            assert_eq!(
                validate(&world(), &missing),
                Err(Rejection::MissingTarget { kind })
            );

            let unknown = Action::new(kind, "x").with_target("lv_bu");
            assert_eq!(
                validate(&world(), &unknown),
                Err(Rejection::TargetNotFound("lv_bu".to_string()))
            );

            let dead = Action::new(kind, "x").with_target("dead_char");
            assert!(matches!(
                validate(&world(), &dead),
                Err(Rejection::TargetDead { .. })
            ));
        }
    }

    #[test]
    fn duplicate_event_ids_are_rejected() {
        let mut state = world();
        state.time = 5;
        state.events.push(Event {
            id: "e1".to_string(),
            time: 2,
            kind: "move".to_string(),
            actor: PLAYER_ID.to_string(),
            extra: Default::default(),
        });

        let action = Action::new(ActionKind::Move, "走")
            .with_destination("luo_yang")
            .with_event("e1");
        assert_eq!(
            validate(&state, &action),
            Err(Rejection::EventAlreadyOccurred("e1".to_string()))
        );
    }

    #[test]
    fn stale_timeline_tail_blocks_new_events() {
        // Last recorded event sits at time 12 while the world clock is 10;
        // the next event would be stamped 11, behind the tail.
        let mut state = world();
        state.time = 10;
        state.events.push(Event {
            id: "e1".to_string(),
            time: 12,
            kind: "move".to_string(),
            actor: PLAYER_ID.to_string(),
            extra: Default::default(),
        });

        let action = Action::new(ActionKind::Move, "走")
            .with_destination("luo_yang")
            .with_event("e2");
        assert_eq!(
            validate(&state, &action),
            Err(Rejection::EventTimeNotMonotonic { last: 12, next: 11 })
        );
    }

    #[test]
    fn first_event_on_an_empty_timeline_is_accepted() {
        let action = Action::new(ActionKind::Move, "走")
            .with_destination("luo_yang")
            .with_event("first_event");
        assert_eq!(validate(&world(), &action), Ok(()));
    }

    #[test]
    fn validate_is_referentially_transparent() {
        let state = world();
        let action = Action::new(ActionKind::Rescue, "救").with_target("liu_bei");
        let snapshot = state.clone();

        assert_eq!(validate(&state, &action), validate(&state, &action));
        assert_eq!(state, snapshot);
    }
}
