//! Router node: classify the document and pick the model tier.

use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::nodes::elapsed_ms;
use crate::pipeline::parse::parse_llm_json;
use crate::pipeline::prompts::{format_router_prompt, ROUTER_SYSTEM_PROMPT};
use crate::routing::{classify_complexity, extract_signals, select_model};
use crate::traits::model::{ModelInvoker, ModelRequest, ModelResponse, ModelTier};
use crate::types::config::ModelConfig;
use crate::types::state::{CaseDelta, CaseState, DecisionType, LegalMatter, RouterResult, Stage};

/// Confidence assumed when the classifier's value is not a number.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Reasoning recorded when the classifier gives none.
pub const DEFAULT_REASONING: &str = "automatic classification";

/// Run the router on `state.raw_text` with the fast tier.
pub async fn run(state: &CaseState, model: &dyn ModelInvoker, config: &ModelConfig) -> CaseDelta {
    let start = Instant::now();

    match classify(&state.raw_text, model, config).await {
        Ok((result, response)) => {
            debug!(
                extraction_id = %state.extraction_id,
                legal_matter = %result.legal_matter,
                decision_type = %result.decision_type,
                complexity = result.complexity,
                complexity_hint = ?result.complexity_hint,
                tier = %result.selected_model,
                "Router classified case"
            );
            CaseDelta {
                router_result: Some(result),
                tokens_input: response.tokens_in,
                tokens_output: response.tokens_out,
                latency_ms: elapsed_ms(start),
                ..Default::default()
            }
        }
        Err(e) => CaseDelta::failed(Stage::Router, e).with_latency(elapsed_ms(start)),
    }
}

/// Ask the fast tier to classify `raw_text`.
pub async fn classify(
    raw_text: &str,
    model: &dyn ModelInvoker,
    config: &ModelConfig,
) -> Result<(RouterResult, ModelResponse)> {
    let request = ModelRequest::new(format_router_prompt(raw_text))
        .with_system(ROUTER_SYSTEM_PROMPT)
        .with_max_tokens(config.max_tokens);

    let response = model.invoke(ModelTier::Fast, request).await?;
    let classification: Value = parse_llm_json(&response.text)?;
    Ok((interpret(&classification, raw_text), response))
}

/// Turn the classifier's JSON into a [`RouterResult`].
///
/// Never fails: unknown enum values fall back to [`LegalMatter::Civil`]
/// and [`DecisionType::Despacho`], confidence is clamped to [0, 1], and the
/// complexity score is recomputed from `raw_text` heuristics. The
/// classifier's own complexity number is kept only as a hint.
pub fn interpret(classification: &Value, raw_text: &str) -> RouterResult {
    let legal_matter = match string_field(classification, &["legalMatter", "legal_matter"]) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = raw, "Unknown legal matter, falling back to civil");
            LegalMatter::default()
        }),
        None => {
            warn!("Classifier omitted legal matter, falling back to civil");
            LegalMatter::default()
        }
    };

    let decision_type = match string_field(classification, &["decisionType", "decision_type"]) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = raw, "Unknown decision type, falling back to despacho");
            DecisionType::default()
        }),
        None => {
            warn!("Classifier omitted decision type, falling back to despacho");
            DecisionType::default()
        }
    };

    let confidence = classification
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let reasoning = string_field(classification, &["reasoning"])
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(DEFAULT_REASONING)
        .to_string();

    let complexity_hint = classification.get("complexity").and_then(Value::as_f64);

    let complexity = classify_complexity(&extract_signals(raw_text, legal_matter, confidence));
    let selection = select_model(complexity);

    RouterResult {
        legal_matter,
        decision_type,
        complexity,
        confidence,
        selected_model: selection.tier,
        reasoning,
        complexity_hint,
    }
}

fn string_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_str))
}
