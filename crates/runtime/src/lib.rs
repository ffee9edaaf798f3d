//! Runtime orchestration around the pure narrative engine.
//!
//! This crate wires the state store, the lore retriever, and the
//! language-model collaborator into a cohesive service API. Consumers embed
//! [`GameService`] to submit actions directly or drive the narrated chat
//! path.
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the orchestrator and the outward outcome shapes
//! - [`repository`] provides state persistence adapters
//! - [`narrator`] abstracts the language-model collaborator
//! - [`prompt`] and [`parse`] shape and decode model traffic
//! - [`config`] reads environment-driven settings
pub mod config;
pub mod error;
pub mod narrator;
pub mod parse;
pub mod prompt;
pub mod repository;
pub mod service;

pub use config::RuntimeConfig;
pub use error::ServiceError;
pub use narrator::{ChatMessage, LanguageModel, LanguageModelError, OpenAiChatClient};
pub use parse::{ParseFailure, Proposal};
pub use repository::{FileStateStore, InMemoryStateStore, StateStore, StoreError};
pub use service::{ChatOutcome, GameService, SubmitOutcome};
