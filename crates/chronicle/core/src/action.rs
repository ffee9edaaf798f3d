//! Proposed changes to the world, as typed immutable values.
//!
//! An [`Action`] is constructed from untrusted input: a deserialized request
//! body or parsed model output. Structural failures ([`MalformedAction`]) are
//! distinct from business-rule rejections, which the validator reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::PLAYER_ID;

/// The five kinds of world-affecting actions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Talk,
    GiveItem,
    Move,
    Attack,
    Rescue,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Talk,
        ActionKind::GiveItem,
        ActionKind::Move,
        ActionKind::Attack,
        ActionKind::Rescue,
    ];

    /// Returns the snake_case string representation of the action kind.
    ///
    /// Used for event provenance, logging, and serialization keys.
    pub fn as_snake_case(self) -> &'static str {
        match self {
            ActionKind::Talk => "talk",
            ActionKind::GiveItem => "give_item",
            ActionKind::Move => "move",
            ActionKind::Attack => "attack",
            ActionKind::Rescue => "rescue",
        }
    }
}

/// Structurally invalid action input. Never reaches the validator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MalformedAction {
    #[error("unknown action type: {0}")]
    UnknownType(String),

    #[error("action requires an intent")]
    MissingIntent,

    #[error("malformed action: {0}")]
    Invalid(String),
}

/// A proposed, not-yet-applied change to the world.
///
/// Optional fields carry meaning per kind; empty strings are treated as
/// absent everywhere, matching how loosely the narrating model fills them in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,

    #[serde(default = "default_actor")]
    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    /// Free-text description of what the actor is trying to do. Required;
    /// also inspected by apply as a crude sentiment signal for `talk`.
    pub intent: String,

    /// Unique event id; when present, timeline rules apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

fn default_actor() -> String {
    PLAYER_ID.to_string()
}

impl Action {
    pub fn new(kind: ActionKind, intent: impl Into<String>) -> Self {
        Self {
            kind,
            actor: default_actor(),
            target: None,
            to_location: None,
            item: None,
            intent: intent.into(),
            event: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_destination(mut self, to_location: impl Into<String>) -> Self {
        self.to_location = Some(to_location.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Constructs an action from an untrusted JSON value.
    ///
    /// Fails with [`MalformedAction`] when the value is not an object, names
    /// an unknown `type`, or lacks a non-empty `intent`. These are structural
    /// errors surfaced before any business rule runs.
    pub fn from_value(value: Value) -> Result<Self, MalformedAction> {
        let object = value
            .as_object()
            .ok_or_else(|| MalformedAction::Invalid("action must be a JSON object".to_string()))?;

        let kind = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MalformedAction::Invalid("action type is missing".to_string()))?;
        if !ActionKind::ALL.iter().any(|k| k.as_snake_case() == kind) {
            return Err(MalformedAction::UnknownType(kind.to_string()));
        }

        match object.get("intent").and_then(Value::as_str) {
            Some(intent) if !intent.trim().is_empty() => {}
            _ => return Err(MalformedAction::MissingIntent),
        }

        serde_json::from_value(value).map_err(|error| MalformedAction::Invalid(error.to_string()))
    }

    pub fn target_id(&self) -> Option<&str> {
        non_empty(self.target.as_deref())
    }

    pub fn destination(&self) -> Option<&str> {
        non_empty(self.to_location.as_deref())
    }

    pub fn item_id(&self) -> Option<&str> {
        non_empty(self.item.as_deref())
    }

    pub fn event_id(&self) -> Option<&str> {
        non_empty(self.event.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_a_full_action() {
        let action = Action::from_value(json!({
            "type": "give_item",
            "actor": "player",
            "target": "liu_bei",
            "item": "sword_1",
            "intent": "献上佩剑"
        }))
        .unwrap();

        assert_eq!(action.kind, ActionKind::GiveItem);
        assert_eq!(action.target_id(), Some("liu_bei"));
        assert_eq!(action.item_id(), Some("sword_1"));
    }

    #[test]
    fn from_value_defaults_actor_to_player() {
        let action = Action::from_value(json!({"type": "talk", "intent": "hi"})).unwrap();
        assert_eq!(action.actor, PLAYER_ID);
    }

    #[test]
    fn unknown_type_is_malformed() {
        let error = Action::from_value(json!({"type": "fly", "intent": "up"})).unwrap_err();
        assert_eq!(error, MalformedAction::UnknownType("fly".to_string()));
    }

    #[test]
    fn missing_or_blank_intent_is_malformed() {
        let error = Action::from_value(json!({"type": "talk"})).unwrap_err();
        assert_eq!(error, MalformedAction::MissingIntent);

        let error = Action::from_value(json!({"type": "talk", "intent": "  "})).unwrap_err();
        assert_eq!(error, MalformedAction::MissingIntent);
    }

    #[test]
    fn non_object_input_is_malformed() {
        assert!(matches!(
            Action::from_value(json!("talk")),
            Err(MalformedAction::Invalid(_))
        ));
    }

    #[test]
    fn empty_optional_fields_read_as_absent() {
        let action = Action::from_value(json!({
            "type": "move",
            "intent": "走",
            "to_location": "",
            "event": ""
        }))
        .unwrap();

        assert_eq!(action.destination(), None);
        assert_eq!(action.event_id(), None);
    }
}
