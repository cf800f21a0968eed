//! Configuration types for the analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::retrieval::fusion::DEFAULT_RRF_K;
use crate::traits::model::ModelTier;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub models: ModelConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.models.validate()?;
        self.retrieval.validate()
    }
}

/// Model identifiers per tier and shared generation limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Fast/cheap tier, used by the router and for simple cases.
    ///
    /// Default: "gemini-2.5-flash".
    pub fast: String,

    /// Standard tier. Default: "claude-sonnet-4".
    pub standard: String,

    /// Premium tier. Default: "claude-opus-4".
    pub premium: String,

    /// Output token cap per invocation. Default: 4096.
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fast: "gemini-2.5-flash".to_string(),
            standard: "claude-sonnet-4".to_string(),
            premium: "claude-opus-4".to_string(),
            max_tokens: 4096,
        }
    }
}

impl ModelConfig {
    /// Model identifier configured for a tier.
    pub fn model_id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Standard => &self.standard,
            ModelTier::Premium => &self.premium,
        }
    }

    pub fn with_model(mut self, tier: ModelTier, id: impl Into<String>) -> Self {
        let id = id.into();
        match tier {
            ModelTier::Fast => self.fast = id,
            ModelTier::Standard => self.standard = id,
            ModelTier::Premium => self.premium = id,
        }
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn validate(&self) -> Result<()> {
        for tier in ModelTier::ALL {
            if self.model_id(tier).trim().is_empty() {
                return Err(AnalysisError::config(format!(
                    "model id for tier {tier} is empty"
                )));
            }
        }
        if self.max_tokens == 0 {
            return Err(AnalysisError::config("max_tokens must be positive"));
        }
        Ok(())
    }
}

/// Settings for vector + graph retrieval and rank fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Characters of raw text embedded for the vector query. Default: 2000.
    pub embed_prefix_chars: usize,

    /// Top-k passages from the vector index. Default: 5.
    pub vector_limit: usize,

    /// Minimum cosine similarity for vector hits. Default: none.
    pub min_similarity: Option<f64>,

    /// Restrict vector hits to the router's legal matter. Default: true.
    pub filter_by_legal_matter: bool,

    /// Characters of raw text used as the graph keyword. Default: 200.
    pub graph_query_chars: usize,

    /// Maximum keyword hits from the graph. Default: 5.
    pub graph_limit: usize,

    /// Only keep entities of these types (empty = all types).
    pub entity_types: Vec<String>,

    /// Expand from the top keyword hit by graph traversal. Default: true.
    pub expand_graph: bool,

    /// Maximum hops for graph traversal. Default: 2.
    pub traversal_depth: usize,

    /// Maximum entities added by traversal. Default: 5.
    pub traversal_limit: usize,

    /// RRF smoothing constant; smaller values favor top ranks more.
    ///
    /// Default: 60.
    pub rrf_k: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embed_prefix_chars: 2000,
            vector_limit: 5,
            min_similarity: None,
            filter_by_legal_matter: true,
            graph_query_chars: 200,
            graph_limit: 5,
            entity_types: vec![],
            expand_graph: true,
            traversal_depth: 2,
            traversal_limit: 5,
            rrf_k: DEFAULT_RRF_K,
        }
    }
}

impl RetrievalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector_limit(mut self, limit: usize) -> Self {
        self.vector_limit = limit;
        self
    }

    pub fn with_min_similarity(mut self, threshold: f64) -> Self {
        self.min_similarity = Some(threshold);
        self
    }

    pub fn with_graph_limit(mut self, limit: usize) -> Self {
        self.graph_limit = limit;
        self
    }

    pub fn with_entity_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entity_types = types.into_iter().map(|t| t.into()).collect();
        self
    }

    pub fn with_traversal(mut self, depth: usize, limit: usize) -> Self {
        self.traversal_depth = depth;
        self.traversal_limit = limit;
        self
    }

    pub fn with_expand_graph(mut self, expand: bool) -> Self {
        self.expand_graph = expand;
        self
    }

    pub fn with_rrf_k(mut self, k: f64) -> Self {
        self.rrf_k = k;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.rrf_k <= 0.0 || !self.rrf_k.is_finite() {
            return Err(AnalysisError::config(format!(
                "rrf_k must be a positive number, got {}",
                self.rrf_k
            )));
        }
        if self.vector_limit == 0 || self.graph_limit == 0 {
            return Err(AnalysisError::config("retrieval limits must be positive"));
        }
        if self.embed_prefix_chars == 0 || self.graph_query_chars == 0 {
            return Err(AnalysisError::config("query prefix lengths must be positive"));
        }
        Ok(())
    }
}
