//! Environment-driven runtime configuration.

use std::env;
use std::path::PathBuf;

use crate::service::DEFAULT_TOP_K;

/// Configuration required to assemble a [`crate::GameService`].
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Path of the persisted world document.
    pub state_path: PathBuf,

    /// Path of the lore corpus (markdown, paragraph-chunked).
    pub lore_path: PathBuf,

    /// Base URL of an OpenAI-compatible chat-completion endpoint.
    pub api_base_url: String,

    /// Bearer token for the endpoint, if required.
    pub api_key: Option<String>,

    /// Model name sent with every completion request.
    pub model: String,

    /// Lore chunks retrieved per narrated turn.
    pub top_k: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("data/state.json"),
            lore_path: PathBuf::from("data/story.md"),
            api_base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CHRONICLE_STATE_PATH` - World document location (default: data/state.json)
    /// - `CHRONICLE_LORE_PATH` - Lore corpus location (default: data/story.md)
    /// - `CHRONICLE_API_BASE` - Chat-completion endpoint base URL
    /// - `CHRONICLE_API_KEY` / `OPENAI_API_KEY` - Bearer token (first one set wins)
    /// - `CHRONICLE_MODEL` - Model name (default: gpt-4o-mini)
    /// - `CHRONICLE_TOP_K` - Lore chunks per turn (default: 3)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("CHRONICLE_STATE_PATH") {
            config.state_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("CHRONICLE_LORE_PATH") {
            config.lore_path = PathBuf::from(path);
        }
        if let Ok(base) = env::var("CHRONICLE_API_BASE") {
            config.api_base_url = base;
        }
        config.api_key = env::var("CHRONICLE_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok();
        if let Ok(model) = env::var("CHRONICLE_MODEL") {
            config.model = model;
        }
        if let Some(top_k) = read_env::<usize>("CHRONICLE_TOP_K") {
            config.top_k = top_k.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
