//! Service-level error taxonomy.
//!
//! Business rejections are *not* errors — the engine returns them as values.
//! Everything here is a request-level fault the orchestrator catches and maps
//! into an outcome shape, so callers always receive a state alongside the
//! error text.

use chronicle_core::MalformedAction;
use thiserror::Error;

use crate::narrator::LanguageModelError;
use crate::parse::ParseFailure;
use crate::repository::StoreError;

/// Faults surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("message required")]
    MessageRequired,

    #[error(transparent)]
    Malformed(#[from] MalformedAction),

    #[error("persistence fault: {0}")]
    Store(#[from] StoreError),

    #[error("upstream fault: {0}")]
    Upstream(#[from] LanguageModelError),

    #[error(transparent)]
    ResponseParse(#[from] ParseFailure),
}
