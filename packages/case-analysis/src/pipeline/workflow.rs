//! Workflow runner: wires the supervisor and nodes into one entry point.

use std::sync::Arc;
use tracing::{error, info};

use crate::error::Result;
use crate::pipeline::nodes::{drafter, retrieval, router, specialist};
use crate::pipeline::supervisor::next_stage;
use crate::pipeline::templates::TemplateRegistry;
use crate::retrieval::hybrid::HybridRetriever;
use crate::traits::{EmbeddingService, GraphStore, ModelInvoker, VectorIndex};
use crate::types::config::PipelineConfig;
use crate::types::state::{CaseDelta, CaseState, Stage};

/// The analysis pipeline for one deployment.
///
/// Collaborators are shared read-only, so one `Workflow` can run many
/// cases concurrently; each call owns its own [`CaseState`].
///
/// # Example
///
/// ```rust,ignore
/// let workflow = Workflow::new(model, embedder, index, graph);
///
/// let state = CaseState::new(extraction_id, document_id, user_id, raw_text);
/// let done = workflow.invoke(state).await;
///
/// match done.error {
///     Some(message) => mark_failed(message),
///     None => save_draft(done.draft_text),
/// }
/// ```
pub struct Workflow {
    model: Arc<dyn ModelInvoker>,
    retriever: HybridRetriever,
    templates: TemplateRegistry,
    config: PipelineConfig,
}

impl Workflow {
    /// Create a workflow with the default configuration and templates.
    pub fn new(
        model: Arc<dyn ModelInvoker>,
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        graph: Arc<dyn GraphStore>,
    ) -> Self {
        Self {
            model,
            retriever: HybridRetriever::new(embedder, index, graph),
            templates: TemplateRegistry::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Use a custom configuration, rejecting invalid settings.
    pub fn with_config(mut self, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Use a custom drafting template registry.
    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline until it reaches a terminal stage.
    ///
    /// Accepts a fresh state or one resumed from persistence; stages whose
    /// fields are already set are not re-run. Check `error` on the result
    /// before trusting `analysis_result` or `draft_text`.
    pub async fn invoke(&self, mut state: CaseState) -> CaseState {
        loop {
            let stage = next_stage(&state);
            if stage.is_terminal() {
                state.current_step = stage;
                break;
            }
            state = self.step(state).await;
        }

        match &state.error {
            Some(message) => error!(
                extraction_id = %state.extraction_id,
                error = %message,
                tokens_in = state.tokens_input,
                tokens_out = state.tokens_output,
                latency_ms = state.latency_ms,
                "Case analysis failed"
            ),
            None => info!(
                extraction_id = %state.extraction_id,
                model = state.model_used.as_deref().unwrap_or("none"),
                tokens_in = state.tokens_input,
                tokens_out = state.tokens_output,
                latency_ms = state.latency_ms,
                "Case analysis complete"
            ),
        }
        state
    }

    /// Run exactly one stage, the one the supervisor picks.
    ///
    /// A terminal state is returned unchanged. A node that neither sets
    /// its field nor reports an error stalls the workflow, which is
    /// recorded as an error.
    pub async fn step(&self, mut state: CaseState) -> CaseState {
        let stage = next_stage(&state);
        if stage.is_terminal() {
            return state;
        }

        info!(extraction_id = %state.extraction_id, stage = %stage, "Running stage");
        state.current_step = stage;

        let delta = self.run_node(stage, &state).await;
        state.apply(delta);
        check_progress(stage, &mut state);
        state
    }

    async fn run_node(&self, stage: Stage, state: &CaseState) -> CaseDelta {
        let models = &self.config.models;
        match stage {
            Stage::Router => router::run(state, self.model.as_ref(), models).await,
            Stage::Retrieval => {
                retrieval::run(state, &self.retriever, &self.config.retrieval).await
            }
            Stage::Specialist => specialist::run(state, self.model.as_ref(), models).await,
            Stage::Drafter => {
                drafter::run(state, self.model.as_ref(), &self.templates, models).await
            }
            Stage::Complete | Stage::Error => CaseDelta::default(),
        }
    }
}

/// Record an error if running `stage` left the supervisor on the same stage.
fn check_progress(stage: Stage, state: &mut CaseState) {
    if next_stage(state) == stage {
        state.apply(CaseDelta {
            error: Some(format!("workflow stalled at {stage}")),
            ..Default::default()
        });
    }
}
