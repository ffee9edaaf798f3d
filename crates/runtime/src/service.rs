//! The request orchestrator.
//!
//! [`GameService`] sequences load → validate → apply → save for the direct
//! action path, and adds lore retrieval plus the model round trips for the
//! narrated chat path. Every failure is mapped into an outcome shape carrying
//! the current state, so callers never see a raw fault with no state context.
//!
//! A single async mutex serializes the load/validate/apply/save critical
//! section: two concurrent requests can no longer both load the same
//! snapshot and silently clobber each other's save. Model calls are kept
//! outside the lock — they can take seconds — which is why the chat path
//! reloads the state under the lock before judging the proposed action.

use chronicle_core::{Action, Rejection, WorldState, execute};
use chronicle_lore::LoreBook;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::ServiceError;
use crate::narrator::LanguageModel;
use crate::parse;
use crate::prompt;
use crate::repository::StateStore;

/// Lore chunks handed to the model per turn, unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Result of the direct-action path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub state: WorldState,
}

impl SubmitOutcome {
    fn accepted(state: WorldState) -> Self {
        Self {
            ok: true,
            error: None,
            state,
        }
    }

    fn failed(state: WorldState, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            state,
        }
    }
}

/// Result of the narrated chat path.
///
/// `ok` reports whether the *request* succeeded; a validly processed message
/// whose proposed action was rejected still has `ok: true` with
/// `action_ok: false` and the rejection reason in `error`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatOutcome {
    pub ok: bool,
    pub action_ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub state: WorldState,
}

impl ChatOutcome {
    fn request_failed(state: WorldState, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            action_ok: false,
            narration: None,
            error: Some(error.into()),
            state,
        }
    }
}

/// Orchestrator owning the store, the lore book, and the model collaborator.
pub struct GameService<S, L> {
    store: S,
    model: L,
    lore: LoreBook,
    top_k: usize,
    world_lock: Mutex<()>,
}

impl<S, L> GameService<S, L>
where
    S: StateStore,
    L: LanguageModel,
{
    pub fn new(store: S, model: L, lore: LoreBook) -> Self {
        Self {
            store,
            model,
            lore,
            top_k: DEFAULT_TOP_K,
            world_lock: Mutex::new(()),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Returns the current persisted state without modifying anything.
    pub fn state(&self) -> Result<WorldState, ServiceError> {
        Ok(self.store.load()?)
    }

    /// Runs a typed action through validate → apply → save.
    pub async fn submit(&self, action: Action) -> SubmitOutcome {
        let _guard = self.world_lock.lock().await;

        let state = match self.store.load() {
            Ok(state) => state,
            Err(error) => {
                return SubmitOutcome::failed(
                    WorldState::default(),
                    ServiceError::from(error).to_string(),
                );
            }
        };

        match execute(&state, &action) {
            Ok(next) => match self.store.save(&next) {
                Ok(()) => {
                    tracing::info!("accepted {} by {} (time {})", action.kind, action.actor, next.time);
                    SubmitOutcome::accepted(next)
                }
                Err(error) => {
                    tracing::error!("save failed, keeping previous state: {error}");
                    SubmitOutcome::failed(state, ServiceError::from(error).to_string())
                }
            },
            Err(rejection) => {
                tracing::info!("rejected {} by {}: {rejection}", action.kind, action.actor);
                SubmitOutcome::failed(state, rejection.to_string())
            }
        }
    }

    /// Constructs an action from untrusted JSON, then submits it.
    ///
    /// Structural failures surface immediately and never reach the validator.
    pub async fn submit_raw(&self, value: Value) -> SubmitOutcome {
        match Action::from_value(value) {
            Ok(action) => self.submit(action).await,
            Err(malformed) => {
                let state = self.store.load().unwrap_or_default();
                SubmitOutcome::failed(state, ServiceError::from(malformed).to_string())
            }
        }
    }

    /// The narrated path: free text in, proposed action judged, world
    /// narration out.
    pub async fn chat(&self, message: &str) -> ChatOutcome {
        let preview = match self.store.load() {
            Ok(state) => state,
            Err(error) => {
                return ChatOutcome::request_failed(
                    WorldState::default(),
                    ServiceError::from(error).to_string(),
                );
            }
        };

        if message.trim().is_empty() {
            return ChatOutcome::request_failed(preview, ServiceError::MessageRequired.to_string());
        }

        let entities = entity_names(&preview);
        let snippets = self.lore.retrieve(message, &entities, preview.time, self.top_k);
        let messages = prompt::proposal(&preview, message, &snippets);

        let raw = match self.model.complete(&messages).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!("proposal call failed: {error}");
                return ChatOutcome::request_failed(preview, ServiceError::from(error).to_string());
            }
        };

        let proposal = match parse::parse_proposal(&raw) {
            Ok(proposal) => proposal,
            Err(error) => {
                return ChatOutcome::request_failed(preview, ServiceError::from(error).to_string());
            }
        };
        let action = match Action::from_value(proposal.action) {
            Ok(action) => action,
            Err(malformed) => {
                return ChatOutcome::request_failed(
                    preview,
                    ServiceError::from(malformed).to_string(),
                );
            }
        };

        // Critical section. The proposal was built from a possibly stale
        // snapshot, so reload under the lock before judging the action.
        let (state, rejection) = {
            let _guard = self.world_lock.lock().await;
            let state = match self.store.load() {
                Ok(state) => state,
                Err(error) => {
                    return ChatOutcome::request_failed(
                        preview,
                        ServiceError::from(error).to_string(),
                    );
                }
            };

            match execute(&state, &action) {
                Ok(next) => {
                    return match self.store.save(&next) {
                        Ok(()) => {
                            tracing::info!("accepted {} (time {})", action.kind, next.time);
                            ChatOutcome {
                                ok: true,
                                action_ok: true,
                                narration: Some(proposal.narration),
                                error: None,
                                state: next,
                            }
                        }
                        Err(error) => {
                            tracing::error!("save failed, keeping previous state: {error}");
                            ChatOutcome::request_failed(state, ServiceError::from(error).to_string())
                        }
                    };
                }
                Err(rejection) => (state, rejection),
            }
        };

        // The explanation round trip happens outside the lock; it can block
        // for seconds and touches no state.
        tracing::info!("rejected {}: {rejection}", action.kind);
        let narration = self.explain(&action, &rejection, &state).await;
        ChatOutcome {
            ok: true,
            action_ok: false,
            narration,
            error: Some(rejection.to_string()),
            state,
        }
    }

    /// Asks the model for an in-world explanation of a rejection. Degrades to
    /// no narration when the collaborator fails — the rejection itself is
    /// still reported.
    async fn explain(
        &self,
        action: &Action,
        rejection: &Rejection,
        state: &WorldState,
    ) -> Option<String> {
        let messages = prompt::rejection(action, rejection, state);
        match self.model.complete(&messages).await {
            Ok(text) => Some(text),
            Err(error) => {
                tracing::warn!("explanation call failed: {error}");
                None
            }
        }
    }
}

fn entity_names(state: &WorldState) -> Vec<String> {
    state
        .characters
        .keys()
        .chain(state.items.keys())
        .cloned()
        .collect()
}
