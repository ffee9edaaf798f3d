//! Static background-lore retrieval.
//!
//! The corpus is a markdown document split into paragraph chunks. Retrieval
//! ranks chunks by keyword overlap with the query — entity names (character
//! and item ids known to the world) count more than generic word overlap —
//! and returns the top few to bound prompt size. Nothing here affects engine
//! correctness; the engine only sees the resulting text snippets.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// A chunked lore corpus, ready for ranking.
#[derive(Clone, Debug, Default)]
pub struct LoreBook {
    chunks: Vec<String>,
}

impl LoreBook {
    /// Splits a corpus on blank lines into trimmed, non-empty chunks.
    pub fn from_text(text: &str) -> Self {
        let chunks = text
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(str::to_string)
            .collect();
        Self { chunks }
    }

    /// Reads and chunks a corpus file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read lore corpus at {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns up to `top_k` chunks ranked by relevance to `query`.
    ///
    /// `entities` are world identifiers (characters, items); a query that
    /// names one scores a flat bonus per occurrence in a chunk, on top of the
    /// generic word-overlap score. `_time` is accepted for interface parity
    /// with the orchestrator and does not influence ranking.
    pub fn retrieve(
        &self,
        query: &str,
        entities: &[String],
        _time: u64,
        top_k: usize,
    ) -> Vec<&str> {
        if self.chunks.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let query_lower = query.to_lowercase();
        let tokens = tokenize(&query_lower);
        let named_entities: Vec<String> = entities
            .iter()
            .map(|e| e.to_lowercase())
            .filter(|e| !e.is_empty() && query_lower.contains(e.as_str()))
            .collect();

        let mut scored: Vec<(f64, &str)> = self
            .chunks
            .iter()
            .map(|chunk| (score_chunk(chunk, &tokens, &named_entities), chunk.as_str()))
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(top_k).map(|(_, c)| c).collect()
    }
}

const ENTITY_BONUS: f64 = 1.0;

fn score_chunk(chunk: &str, tokens: &[String], entities: &[String]) -> f64 {
    let chunk_lower = chunk.to_lowercase();
    let mut score = 0.0;

    for token in tokens {
        let length = token.chars().count();
        if length > 1 {
            let count = chunk_lower.matches(token.as_str()).count();
            score += count as f64 * (length as f64 / 10.0);
        }
    }

    for entity in entities {
        let count = chunk_lower.matches(entity.as_str()).count();
        score += count as f64 * ENTITY_BONUS;
    }

    score
}

/// Splits text into runs of CJK ideographs and runs of ASCII letters; all
/// other characters separate tokens.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_kind = None;

    for ch in text.chars() {
        let kind = if is_cjk(ch) {
            Some(TokenKind::Cjk)
        } else if ch.is_ascii_alphabetic() {
            Some(TokenKind::Ascii)
        } else {
            None
        };

        if kind != current_kind && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current_kind = kind;
        if kind.is_some() {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Cjk,
    Ascii,
}

fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}
