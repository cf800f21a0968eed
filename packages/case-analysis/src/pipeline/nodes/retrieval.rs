//! Retrieval node: hybrid retrieval that never fails the pipeline.

use std::time::Instant;
use tracing::{debug, warn};

use crate::pipeline::nodes::elapsed_ms;
use crate::retrieval::hybrid::HybridRetriever;
use crate::types::config::RetrievalConfig;
use crate::types::state::{CaseDelta, CaseState, RetrievalContext};

/// Retrieve context for the case.
///
/// Any retrieval failure is logged and replaced by an empty context, so
/// the specialist runs on the raw text alone.
pub async fn run(
    state: &CaseState,
    retriever: &HybridRetriever,
    config: &RetrievalConfig,
) -> CaseDelta {
    let start = Instant::now();
    let legal_matter = state.router_result.as_ref().map(|r| r.legal_matter);

    let context = match retriever.retrieve(&state.raw_text, legal_matter, config).await {
        Ok(context) => {
            debug!(
                extraction_id = %state.extraction_id,
                fused = context.fused.len(),
                "Retrieval produced context"
            );
            context
        }
        Err(e) => {
            warn!(
                extraction_id = %state.extraction_id,
                error = %e,
                "Retrieval failed, continuing without context"
            );
            RetrievalContext::empty()
        }
    };

    CaseDelta {
        retrieval_context: Some(context),
        latency_ms: elapsed_ms(start),
        ..Default::default()
    }
}
