//! Validate-then-apply execution pipeline.

use crate::action::Action;
use crate::apply::apply;
use crate::state::WorldState;
use crate::validate::{Rejection, validate};

/// Runs an action through the full pipeline: legality check, then the
/// deterministic transition. On rejection the input state is untouched and
/// the caller keeps it; on acceptance the successor state is returned and the
/// input remains valid as the pre-action snapshot.
pub fn execute(state: &WorldState, action: &Action) -> Result<WorldState, Rejection> {
    validate(state, action)?;
    Ok(apply(state, action))
}
