//! Plain data types shared across the pipeline.

pub mod config;
pub mod graph;
pub mod retrieval;
pub mod state;

pub use config::{ModelConfig, PipelineConfig, RetrievalConfig};
pub use graph::{GraphEntity, GraphRelation, TraversalHit};
pub use retrieval::{FusedResult, GraphHit, RankedItem, VectorHit, GRAPH_SOURCE, VECTOR_SOURCE};
pub use state::{
    AnalysisResult, CaseDelta, CaseState, DecisionType, LegalMatter, RetrievalContext,
    RouterResult, Stage,
};
