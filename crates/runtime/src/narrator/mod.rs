//! Language-model collaborator abstraction.
//!
//! The engine treats the model as an opaque `complete(messages) -> text`
//! function whose output is untrusted. Implementations live behind
//! [`LanguageModel`] so tests can script replies without any network.

mod openai;

pub use openai::OpenAiChatClient;

use serde::Serialize;

/// One message in a chat-completion conversation.
#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Failures of the model collaborator, reported at the orchestrator boundary.
#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model returned no completion")]
    EmptyResponse,
}

/// Opaque text-completion collaborator.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LanguageModelError>;
}
