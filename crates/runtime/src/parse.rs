//! Decoding of untrusted model output into a structured proposal.
//!
//! Models routinely wrap JSON in fenced code blocks; the parser tolerates an
//! optional ``` / ```json fence and decodes what is inside. Everything that
//! can go wrong here is a [`ParseFailure`] — distinct from a validation
//! rejection, since no action was even attempted.

use serde_json::Value;

/// Model output decoded into its two required parts.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    /// The proposed action, still untyped; `Action::from_value` judges it.
    pub action: Value,

    /// In-world narration accompanying the proposal.
    pub narration: String,
}

/// Model output that could not be decoded into a proposal.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("model output is missing required key: {0}")]
    MissingKey(&'static str),
}

/// Strips an optional fenced code block and decodes the remaining JSON.
pub fn extract_json(text: &str) -> Result<Value, ParseFailure> {
    let body = strip_code_fence(text);
    serde_json::from_str(body).map_err(|error| ParseFailure::InvalidJson(error.to_string()))
}

/// Decodes model output into a [`Proposal`].
pub fn parse_proposal(text: &str) -> Result<Proposal, ParseFailure> {
    let value = extract_json(text)?;

    let action = value
        .get("action")
        .cloned()
        .ok_or(ParseFailure::MissingKey("action"))?;
    let narration = value
        .get("narration")
        .and_then(Value::as_str)
        .ok_or(ParseFailure::MissingKey("narration"))?
        .to_string();

    Ok(Proposal { action, narration })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let mut body = &trimmed[start + 3..];
    if let Some(rest) = body.strip_prefix("json") {
        body = rest;
    }
    if let Some(end) = body.rfind("```") {
        body = &body[..end];
    }
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bare_json() {
        let proposal =
            parse_proposal(r#"{"action": {"type": "talk", "intent": "hi"}, "narration": "……"}"#)
                .unwrap();
        assert_eq!(proposal.action, json!({"type": "talk", "intent": "hi"}));
        assert_eq!(proposal.narration, "……");
    }

    #[test]
    fn strips_a_json_tagged_fence() {
        let text = "```json\n{\"action\": {\"type\": \"move\", \"intent\": \"走\", \"to_location\": \"luo_yang\"}, \"narration\": \"你动身前往洛阳。\"}\n```";
        let proposal = parse_proposal(text).unwrap();
        assert_eq!(proposal.action["to_location"], "luo_yang");
    }

    #[test]
    fn strips_an_untagged_fence_with_surrounding_prose() {
        let text = "Here is the result:\n```\n{\"action\": {}, \"narration\": \"n\"}\n```\nHope that helps!";
        // Prose after the closing fence is ignored; prose before the opening
        // fence is as well.
        let proposal = parse_proposal(text).unwrap();
        assert_eq!(proposal.narration, "n");
    }

    #[test]
    fn invalid_json_is_a_parse_failure() {
        assert!(matches!(
            parse_proposal("the goblin says no"),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_action_key_is_reported() {
        assert!(matches!(
            parse_proposal(r#"{"narration": "…"}"#),
            Err(ParseFailure::MissingKey("action"))
        ));
    }

    #[test]
    fn missing_narration_key_is_reported() {
        assert!(matches!(
            parse_proposal(r#"{"action": {}}"#),
            Err(ParseFailure::MissingKey("narration"))
        ));
    }
}
