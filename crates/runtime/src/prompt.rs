//! Prompt construction for the narration collaborators.
//!
//! Prompts carry the serialized world state, the player's message, and the
//! retrieved lore so the model grounds its proposal in facts the engine can
//! check. The output contract (a single JSON object with `action` and
//! `narration`) pairs with the tolerant decoding in [`crate::parse`].

use chronicle_core::{Action, Rejection, WorldState};

use crate::narrator::ChatMessage;

/// Builds the proposal conversation for the narrated chat path.
pub fn proposal(state: &WorldState, message: &str, lore: &[&str]) -> Vec<ChatMessage> {
    let state_json = to_pretty_json(state);
    let lore_block = if lore.is_empty() {
        "(no relevant lore found)".to_string()
    } else {
        lore.join("\n\n")
    };

    let system = format!(
        "You are the narrator of a text role-play game set in the Three Kingdoms era.\n\
         The player describes what they want to do; you translate it into exactly one\n\
         game action and narrate the scene.\n\n\
         Current world state:\n{state_json}\n\n\
         Background lore relevant to this turn:\n{lore_block}\n\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"action\": {{\"type\": \"talk|give_item|move|attack|rescue\",\n\
            \"actor\": \"player\", \"target\": \"<character id>\",\n\
            \"to_location\": \"<place id, move only>\", \"item\": \"<item id, give_item only>\",\n\
            \"intent\": \"<what the actor is trying to do>\", \"event\": \"<optional unique event id>\"}},\n\
          \"narration\": \"<one short paragraph of in-world narration>\"}}\n\
         Omit optional fields you do not need. Use only character, item, and place ids\n\
         that exist in the world state, except to_location which may introduce a place."
    );

    vec![ChatMessage::system(system), ChatMessage::user(message)]
}

/// Builds the explanation conversation for a rejected action.
pub fn rejection(action: &Action, rejection: &Rejection, state: &WorldState) -> Vec<ChatMessage> {
    let state_json = to_pretty_json(state);
    let action_json = to_pretty_json(action);

    let system = format!(
        "You are the narrator of a text role-play game set in the Three Kingdoms era.\n\
         The player attempted an action the world's rules do not allow. Explain in one\n\
         short paragraph of in-world narration why it cannot happen. Do not mention\n\
         rules, validators, or JSON.\n\n\
         Current world state:\n{state_json}"
    );
    let user = format!(
        "Attempted action:\n{action_json}\n\nRule violated: {rejection}"
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
