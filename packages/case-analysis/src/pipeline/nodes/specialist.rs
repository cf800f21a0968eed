//! Specialist node: structured FIRAC analysis at the selected tier.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::pipeline::nodes::elapsed_ms;
use crate::pipeline::parse::parse_llm_json;
use crate::pipeline::prompts::{format_specialist_prompt, SPECIALIST_SYSTEM_PROMPT};
use crate::routing::select_model;
use crate::traits::model::{ModelInvoker, ModelRequest};
use crate::types::config::ModelConfig;
use crate::types::state::{AnalysisResult, CaseDelta, CaseState, Stage};

/// JSON the specialist model is asked to return.
///
/// Every field is optional; missing or null fields become empty strings.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpecialistResponse {
    /// Objective summary of the relevant facts
    #[serde(deserialize_with = "lenient_string")]
    pub facts: String,

    /// Central legal question to decide
    #[serde(deserialize_with = "lenient_string")]
    pub issue: String,

    /// Statutes, binding precedents and case law that apply
    #[serde(deserialize_with = "lenient_string")]
    pub rule: String,

    /// Application of the rules to the facts
    #[serde(deserialize_with = "lenient_string")]
    pub application: String,

    /// Older name for `application`
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(skip)]
    pub analysis: String,

    /// Result that follows from the analysis
    #[serde(deserialize_with = "lenient_string")]
    pub conclusion: String,
}

impl SpecialistResponse {
    pub fn into_analysis(self) -> AnalysisResult {
        let application = if self.application.is_empty() {
            self.analysis
        } else {
            self.application
        };
        AnalysisResult {
            facts: self.facts,
            issue: self.issue,
            rule: self.rule,
            application,
            conclusion: self.conclusion,
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Run the specialist analysis.
pub async fn run(state: &CaseState, model: &dyn ModelInvoker, config: &ModelConfig) -> CaseDelta {
    let start = Instant::now();

    match analyze(state, model, config).await {
        Ok(delta) => delta.with_latency(elapsed_ms(start)),
        Err(e) => CaseDelta::failed(Stage::Specialist, e).with_latency(elapsed_ms(start)),
    }
}

async fn analyze(
    state: &CaseState,
    model: &dyn ModelInvoker,
    config: &ModelConfig,
) -> Result<CaseDelta> {
    let router = state
        .router_result
        .as_ref()
        .ok_or(AnalysisError::MissingField {
            field: "router_result",
        })?;

    let selection = select_model(router.complexity);
    let legal_context = state
        .retrieval_context
        .as_ref()
        .and_then(|c| c.fused_text());

    let request = ModelRequest::new(format_specialist_prompt(
        &state.raw_text,
        router.legal_matter,
        router.decision_type,
        legal_context.as_deref(),
    ))
    .with_system(SPECIALIST_SYSTEM_PROMPT)
    .with_reasoning_budget(selection.reasoning_budget)
    .with_max_tokens(config.max_tokens);

    let response = model.invoke(selection.tier, request).await?;
    let parsed: SpecialistResponse = parse_llm_json(&response.text)?;
    let model_id = config.model_id(selection.tier).to_string();

    debug!(
        extraction_id = %state.extraction_id,
        tier = %selection.tier,
        model = %model_id,
        reasoning_budget = ?selection.reasoning_budget,
        tokens_in = response.tokens_in,
        tokens_out = response.tokens_out,
        "Specialist analysis complete"
    );

    Ok(CaseDelta {
        analysis_result: Some(parsed.into_analysis()),
        model_used: Some(model_id),
        tokens_input: response.tokens_in,
        tokens_output: response.tokens_out,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;
    use crate::traits::model::ModelTier;
    use crate::types::retrieval::FusedResult;
    use crate::types::state::{DecisionType, LegalMatter, RetrievalContext, RouterResult};

    fn routed_state(complexity: u8) -> CaseState {
        let mut state = CaseState::new("ext", "doc", "user", "contract dispute");
        state.router_result = Some(RouterResult {
            legal_matter: LegalMatter::Civil,
            decision_type: DecisionType::Sentenca,
            complexity,
            confidence: 0.8,
            selected_model: select_model(complexity).tier,
            reasoning: "r".into(),
            complexity_hint: None,
        });
        state.retrieval_context = Some(RetrievalContext::empty());
        state
    }

    #[test]
    fn test_response_defaults_and_alias() {
        let parsed: SpecialistResponse =
            serde_json::from_str(r#"{"facts": "f", "analysis": "a", "rule": null, "issue": 3}"#).unwrap();
        let analysis = parsed.into_analysis();

        assert_eq!(analysis.facts, "f");
        assert_eq!(analysis.application, "a");
        assert_eq!(analysis.rule, "");
        assert_eq!(analysis.issue, "3");
        assert_eq!(analysis.conclusion, "");
    }

    #[test]
    fn test_application_wins_over_analysis() {
        let parsed: SpecialistResponse =
            serde_json::from_str(r#"{"application": "new", "analysis": "old"}"#).unwrap();
        assert_eq!(parsed.into_analysis().application, "new");
    }

    #[tokio::test]
    async fn test_uses_selected_tier_and_budget() {
        let model = MockModel::new()
            .with_response(ModelTier::Standard, r#"{"facts": "F", "application": "A"}"#)
            .with_usage(900, 400);

        let delta = run(&routed_state(55), &model, &ModelConfig::default()).await;

        assert!(!delta.is_error());
        assert_eq!(delta.model_used.as_deref(), Some("claude-sonnet-4"));
        assert_eq!(delta.tokens_input, 900);
        assert_eq!(delta.analysis_result.unwrap().application, "A");

        let calls = model.calls();
        let call = &calls[0];
        assert_eq!(call.tier, ModelTier::Standard);
        assert_eq!(call.request.reasoning_budget, Some(10_000));
        assert_eq!(call.request.max_tokens, Some(4096));
    }

    #[tokio::test]
    async fn test_fused_context_reaches_the_prompt() {
        let model = MockModel::new().with_response(ModelTier::Premium, "{}");
        let mut state = routed_state(95);
        state.retrieval_context = Some(RetrievalContext {
            fused: vec![FusedResult {
                id: "s297".into(),
                content: "Sumula 297 do STJ".into(),
                score: 1.0,
                source: "graph".into(),
                sources: vec!["graph".into()],
            }],
            ..Default::default()
        });

        let delta = run(&state, &model, &ModelConfig::default()).await;

        assert_eq!(delta.analysis_result, Some(AnalysisResult::default()));
        let calls = model.calls();
        let prompt = &calls[0].request.user_prompt;
        assert!(prompt.contains("<legal_context>\nSumula 297 do STJ\n</legal_context>"));
    }

    #[tokio::test]
    async fn test_failure_is_prefixed() {
        let model = MockModel::new().with_failure(ModelTier::Fast, "timeout");
        let delta = run(&routed_state(10), &model, &ModelConfig::default()).await;

        assert!(delta.analysis_result.is_none());
        assert_eq!(delta.error.as_deref(), Some("specialist failed: model error: timeout"));
    }

    #[tokio::test]
    async fn test_missing_router_result_is_fatal() {
        let model = MockModel::new();
        let state = CaseState::new("ext", "doc", "user", "text");

        let delta = run(&state, &model, &ModelConfig::default()).await;
        assert_eq!(
            delta.error.as_deref(),
            Some("specialist failed: missing required field: router_result")
        );
        assert!(model.calls().is_empty());
    }
}
