//! Legal Case Analysis Pipeline
//!
//! Takes the extracted text of one legal document and produces a structured
//! analysis plus a draft judicial decision, spending model capability in
//! proportion to how hard the case is.
//!
//! # Design Philosophy
//!
//! **"Pay for reasoning only where the case needs it"**
//!
//! - A cheap classifier routes every case; text heuristics score complexity
//! - The score alone picks the model tier and reasoning budget
//! - Retrieval is best-effort: it enriches the prompt but never blocks a draft
//! - Stages are pure functions of the case state, so a stored state resumes
//! - Library handles mechanics, the host handles persistence and delivery
//!
//! # Usage
//!
//! ```rust,ignore
//! use case_analysis::{CaseState, MemoryGraphStore, MemoryVectorIndex, Workflow};
//! use case_analysis::testing::{MockEmbedder, MockModel};
//!
//! let workflow = Workflow::new(
//!     Arc::new(MockModel::new()),
//!     Arc::new(MockEmbedder::new()),
//!     Arc::new(MemoryVectorIndex::new()),
//!     Arc::new(MemoryGraphStore::new()),
//! );
//!
//! let state = CaseState::new("ext-1", "doc-1", "user-1", raw_text);
//! let done = workflow.invoke(state).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability abstractions (ModelInvoker, EmbeddingService, VectorIndex, GraphStore)
//! - [`types`] - Case state, retrieval and configuration types
//! - [`routing`] - Complexity scoring and model selection
//! - [`retrieval`] - Vector and graph retrieval, traversal, rank fusion
//! - [`pipeline`] - Supervisor, stage nodes, prompts and the workflow runner
//! - [`stores`] - In-memory vector index and graph store
//! - [`providers`] - HTTP model/embedding adapters (feature-gated)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod routing;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AnalysisError, Result};
pub use pipeline::{next_stage, parse_llm_json, TemplateRegistry, Workflow};
pub use retrieval::{fusion_rrf, traverse, HybridRetriever, DEFAULT_RRF_K};
pub use routing::{
    classify_complexity, extract_signals, select_model, ComplexityInput, ModelSelection,
};
pub use stores::{MemoryGraphStore, MemoryVectorIndex};
pub use traits::{
    EmbeddingService, GraphStore, ModelInvoker, ModelRequest, ModelResponse, ModelTier,
    TieredInvoker, VectorFilter, VectorIndex,
};
pub use types::{
    config::{ModelConfig, PipelineConfig, RetrievalConfig},
    graph::{GraphEntity, GraphRelation, TraversalHit},
    retrieval::{FusedResult, GraphHit, RankedItem, VectorHit},
    state::{
        AnalysisResult, CaseDelta, CaseState, DecisionType, LegalMatter, RetrievalContext,
        RouterResult, Stage,
    },
};
