//! Lenient JSON extraction from model output.
//!
//! Models asked for "JSON only" still wrap it in markdown fences or add a
//! sentence of preamble. [`parse_llm_json`] tries, in order: the whole
//! text, the first fenced block, and the outermost `{ ... }` slice.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

use crate::error::{AnalysisError, Result};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?```").expect("fence pattern is valid")
});

/// Characters of the raw output quoted in the error when nothing parses.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Parse a JSON value out of raw model output.
///
/// A fenced block or brace slice that is found but malformed fails with
/// its parse error rather than falling through.
pub fn parse_llm_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    if let Some(captures) = FENCED_BLOCK.captures(raw) {
        let inner = captures.get(1).map_or("", |m| m.as_str()).trim();
        return Ok(serde_json::from_str(inner)?);
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if end > start {
            return Ok(serde_json::from_str(&raw[start..=end])?);
        }
    }

    let excerpt: String = raw.chars().take(ERROR_EXCERPT_CHARS).collect();
    Err(AnalysisError::InvalidResponse {
        reason: format!("cannot extract JSON from model output: {excerpt}"),
    })
}
