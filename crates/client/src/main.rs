//! Chronicle game client binary.
//!
//! The composition root: it reads configuration from the environment,
//! assembles the file-backed state store, the lore book, and the
//! chat-completion client into a [`GameService`], then drives a line-based
//! terminal session.
//!
//! # Session commands
//!
//! - plain text           — narrated turn (the model proposes the action)
//! - `/do <action json>`  — submit an action directly, bypassing the model
//! - `/state`             — print the current world document
//! - `/quit`              — exit
//!
//! # Examples
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run -p chronicle-client
//!
//! CHRONICLE_STATE_PATH=saves/campaign.json CHRONICLE_MODEL=gpt-4o \
//!     cargo run -p chronicle-client
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use chronicle_lore::LoreBook;
use runtime::{
    ChatOutcome, FileStateStore, GameService, LanguageModel, OpenAiChatClient, RuntimeConfig,
    StateStore, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    tracing::info!("starting chronicle client");
    tracing::info!("state document: {}", config.state_path.display());
    tracing::info!("lore corpus: {}", config.lore_path.display());
    tracing::info!("model: {} via {}", config.model, config.api_base_url);

    let store = FileStateStore::new(&config.state_path);
    let lore = match LoreBook::load(&config.lore_path) {
        Ok(book) => {
            tracing::info!("loaded {} lore chunks", book.len());
            book
        }
        Err(error) => {
            tracing::warn!("{error:#}; continuing without lore");
            LoreBook::default()
        }
    };

    let api_key = config
        .api_key
        .clone()
        .context("no API key set (CHRONICLE_API_KEY or OPENAI_API_KEY)")?;
    let model = OpenAiChatClient::new(&config.api_base_url, api_key, &config.model);

    let service = GameService::new(store, model, lore).with_top_k(config.top_k);
    run_session(&service).await
}

async fn run_session<S, L>(service: &GameService<S, L>) -> Result<()>
where
    S: StateStore,
    L: LanguageModel,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Chronicle of the Three Kingdoms — type your deeds, /state, /do <json>, or /quit.");
    prompt_marker()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input.is_empty() {
            prompt_marker()?;
            continue;
        }

        match input.split_once(' ').map_or((input, ""), |(c, r)| (c, r)) {
            ("/quit", _) | ("/exit", _) => break,
            ("/state", _) => print_state(service)?,
            ("/do", rest) => {
                let outcome = submit_json(service, rest).await;
                print_submit(&outcome);
            }
            _ => {
                let outcome = service.chat(input).await;
                print_chat(&outcome);
            }
        }

        prompt_marker()?;
    }

    tracing::info!("session closed");
    Ok(())
}

async fn submit_json<S, L>(service: &GameService<S, L>, raw: &str) -> SubmitOutcome
where
    S: StateStore,
    L: LanguageModel,
{
    match serde_json::from_str(raw) {
        Ok(value) => service.submit_raw(value).await,
        Err(error) => {
            let state = service.state().unwrap_or_default();
            SubmitOutcome {
                ok: false,
                error: Some(format!("not valid JSON: {error}")),
                state,
            }
        }
    }
}

fn print_state<S, L>(service: &GameService<S, L>) -> Result<()>
where
    S: StateStore,
    L: LanguageModel,
{
    let state = service.state()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn print_submit(outcome: &SubmitOutcome) {
    if outcome.ok {
        println!("accepted — world time is now {}", outcome.state.time);
    } else {
        println!(
            "refused — {}",
            outcome.error.as_deref().unwrap_or("unknown fault")
        );
    }
}

fn print_chat(outcome: &ChatOutcome) {
    if let Some(narration) = &outcome.narration {
        println!("{narration}");
    }
    if !outcome.ok {
        println!(
            "(the chronicle falters: {})",
            outcome.error.as_deref().unwrap_or("unknown fault")
        );
    } else if !outcome.action_ok && outcome.narration.is_none() {
        // Rejection with no in-world explanation available.
        println!(
            "(nothing comes of it: {})",
            outcome.error.as_deref().unwrap_or("the world refuses")
        );
    }
}

fn prompt_marker() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
