//! Drafter node: write the decision draft from the analysis.

use std::time::Instant;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::pipeline::nodes::elapsed_ms;
use crate::pipeline::prompts::build_case_document;
use crate::pipeline::templates::TemplateRegistry;
use crate::routing::select_model;
use crate::traits::model::{ModelInvoker, ModelRequest};
use crate::types::config::ModelConfig;
use crate::types::state::{CaseDelta, CaseState, Stage};

/// Draft the decision at the same tier and budget as the analysis.
pub async fn run(
    state: &CaseState,
    model: &dyn ModelInvoker,
    templates: &TemplateRegistry,
    config: &ModelConfig,
) -> CaseDelta {
    let start = Instant::now();

    match draft(state, model, templates, config).await {
        Ok(delta) => delta.with_latency(elapsed_ms(start)),
        Err(e) => CaseDelta::failed(Stage::Drafter, e).with_latency(elapsed_ms(start)),
    }
}

async fn draft(
    state: &CaseState,
    model: &dyn ModelInvoker,
    templates: &TemplateRegistry,
    config: &ModelConfig,
) -> Result<CaseDelta> {
    let router = state
        .router_result
        .as_ref()
        .ok_or(AnalysisError::MissingField {
            field: "router_result",
        })?;
    let analysis = state
        .analysis_result
        .as_ref()
        .ok_or(AnalysisError::MissingField {
            field: "analysis_result",
        })?;

    let selection = select_model(router.complexity);
    let template = templates.for_matter(router.legal_matter);
    let document = build_case_document(&state.raw_text, analysis, state.retrieval_context.as_ref());

    let request = ModelRequest::new(document)
        .with_system(template)
        .with_reasoning_budget(selection.reasoning_budget)
        .with_max_tokens(config.max_tokens);

    let response = model.invoke(selection.tier, request).await?;

    debug!(
        extraction_id = %state.extraction_id,
        tier = %selection.tier,
        legal_matter = %router.legal_matter,
        draft_chars = response.text.chars().count(),
        tokens_out = response.tokens_out,
        "Draft complete"
    );

    Ok(CaseDelta {
        draft_text: Some(response.text),
        tokens_input: response.tokens_in,
        tokens_output: response.tokens_out,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::templates::GENERIC_TEMPLATE;
    use crate::testing::MockModel;
    use crate::traits::model::ModelTier;
    use crate::types::state::{AnalysisResult, DecisionType, LegalMatter, RouterResult};

    fn analyzed_state(complexity: u8) -> CaseState {
        let mut state = CaseState::new("ext", "doc", "user", "Autor & Reu");
        state.router_result = Some(RouterResult {
            legal_matter: LegalMatter::Labor,
            decision_type: DecisionType::Sentenca,
            complexity,
            confidence: 0.8,
            selected_model: select_model(complexity).tier,
            reasoning: "r".into(),
            complexity_hint: None,
        });
        state.analysis_result = Some(AnalysisResult {
            facts: "dismissal".into(),
            ..Default::default()
        });
        state
    }

    #[tokio::test]
    async fn test_drafts_with_template_and_case_document() {
        let model = MockModel::new()
            .with_response(ModelTier::Premium, "RELATÓRIO ... DISPOSITIVO")
            .with_usage(2000, 800);

        let delta = run(
            &analyzed_state(75),
            &model,
            &TemplateRegistry::new(),
            &ModelConfig::default(),
        )
        .await;

        assert_eq!(delta.draft_text.as_deref(), Some("RELATÓRIO ... DISPOSITIVO"));
        assert_eq!(delta.tokens_input, 2000);
        assert_eq!(delta.tokens_output, 800);

        let calls = model.calls();
        let request = &calls[0].request;
        assert_eq!(request.system_prompt.as_deref(), Some(GENERIC_TEMPLATE));
        assert_eq!(request.reasoning_budget, Some(16_000));
        assert!(request.user_prompt.contains("<content>Autor &amp; Reu</content>"));
        assert!(request.user_prompt.contains("<facts>dismissal</facts>"));
        assert!(request.user_prompt.contains("<status>unavailable</status>"));
    }

    #[tokio::test]
    async fn test_registered_template_is_used() {
        let model = MockModel::new().with_response(ModelTier::Fast, "draft");
        let templates = TemplateRegistry::new()
            .register("labor", "labor court house style")
            .alias("labor", "labor");

        run(&analyzed_state(10), &model, &templates, &ModelConfig::default()).await;

        let calls = model.calls();
        assert_eq!(
            calls[0].request.system_prompt.as_deref(),
            Some("labor court house style")
        );
    }

    #[tokio::test]
    async fn test_model_failure_is_prefixed() {
        let failing = MockModel::new().with_failure(ModelTier::Fast, "overloaded");
        let delta = run(
            &analyzed_state(10),
            &failing,
            &TemplateRegistry::new(),
            &ModelConfig::default(),
        )
        .await;

        assert!(delta.draft_text.is_none());
        assert_eq!(delta.error.as_deref(), Some("drafter failed: model error: overloaded"));
    }

    #[tokio::test]
    async fn test_missing_analysis_is_fatal() {
        let mut state = analyzed_state(10);
        state.analysis_result = None;

        let delta = run(
            &state,
            &MockModel::new(),
            &TemplateRegistry::new(),
            &ModelConfig::default(),
        )
        .await;
        assert_eq!(
            delta.error.as_deref(),
            Some("drafter failed: missing required field: analysis_result")
        );
    }
}
