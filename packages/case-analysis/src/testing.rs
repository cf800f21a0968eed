//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the case analysis
//! library without making real model, embedding, or database calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{AnalysisError, Result};
use crate::traits::{
    embedding::EmbeddingService,
    graph::GraphStore,
    model::{ModelInvoker, ModelRequest, ModelResponse, ModelTier},
    vector::{VectorFilter, VectorIndex},
};
use crate::types::{
    graph::{GraphEntity, GraphRelation},
    retrieval::VectorHit,
};

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub struct MockModelCall {
    pub tier: ModelTier,
    pub request: ModelRequest,
}

/// A mock model invoker with scripted responses per tier.
///
/// Each tier holds a queue of responses. A call takes the front of the
/// queue; the last response stays and is repeated for later calls.
/// A tier with nothing scripted fails with a model error.
#[derive(Default)]
pub struct MockModel {
    responses: Arc<Mutex<HashMap<ModelTier, VecDeque<String>>>>,

    /// Tiers that always fail, with their error message
    failures: Arc<Mutex<HashMap<ModelTier, String>>>,

    /// Token usage reported with every response
    usage: (u64, u64),

    /// Call tracking for assertions
    calls: Arc<Mutex<Vec<MockModelCall>>>,
}

impl MockModel {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a tier.
    pub fn with_response(self, tier: ModelTier, text: impl Into<String>) -> Self {
        lock(&self.responses)
            .entry(tier)
            .or_default()
            .push_back(text.into());
        self
    }

    /// Make every call at `tier` fail with a model error.
    pub fn with_failure(self, tier: ModelTier, message: impl Into<String>) -> Self {
        lock(&self.failures).insert(tier, message.into());
        self
    }

    /// Token usage reported with every response.
    pub fn with_usage(mut self, tokens_in: u64, tokens_out: u64) -> Self {
        self.usage = (tokens_in, tokens_out);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        lock(&self.calls).clone()
    }

    /// Tiers called, in call order.
    pub fn called_tiers(&self) -> Vec<ModelTier> {
        lock(&self.calls).iter().map(|c| c.tier).collect()
    }
}

#[async_trait]
impl ModelInvoker for MockModel {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse> {
        lock(&self.calls).push(MockModelCall { tier, request });

        if let Some(message) = lock(&self.failures).get(&tier) {
            return Err(AnalysisError::model(message.clone()));
        }

        let mut responses = lock(&self.responses);
        let queue = responses
            .get_mut(&tier)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AnalysisError::model(format!("no scripted response for {tier} tier")))?;

        let text = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };

        let (tokens_in, tokens_out) = self.usage;
        Ok(ModelResponse::new(text).with_usage(tokens_in, tokens_out))
    }
}

/// A mock embedding service producing deterministic vectors.
///
/// The same text always embeds to the same vector, so a passage indexed
/// under its own text is a perfect match for a query with that text.
pub struct MockEmbedder {
    dimension: usize,
    embeddings: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    /// Create a mock with the `text-embedding-3-small` dimension (1536).
    pub fn new() -> Self {
        Self {
            dimension: 1536,
            embeddings: Arc::new(Mutex::new(HashMap::new())),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Add a predefined embedding for text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        lock(&self.embeddings).insert(text.into(), embedding);
        self
    }

    /// Texts embedded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Generate a deterministic embedding based on text.
    fn generate_deterministic_embedding(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};

        let hash = Sha256::digest(text.as_bytes());

        (0..self.dimension)
            .map(|i| {
                let byte = hash[i % hash.len()] as f32;
                // Normalize to [-1, 1] range
                (byte / 127.5) - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        lock(&self.calls).push(text.to_string());

        if self.fail {
            return Err(AnalysisError::embedding("embedding service unavailable"));
        }

        Ok(lock(&self.embeddings)
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.generate_deterministic_embedding(text)))
    }
}

/// A vector index whose every query fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingVectorIndex;

#[async_trait]
impl VectorIndex for FailingVectorIndex {
    async fn query(
        &self,
        _embedding: &[f32],
        _limit: usize,
        _filter: &VectorFilter,
    ) -> Result<Vec<VectorHit>> {
        Err(AnalysisError::vector_index("connection refused"))
    }
}

/// A graph store whose every lookup fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGraphStore;

#[async_trait]
impl GraphStore for FailingGraphStore {
    async fn keyword_search(
        &self,
        _keyword: &str,
        _limit: usize,
        _entity_types: &[String],
    ) -> Result<Vec<GraphEntity>> {
        Err(AnalysisError::graph("connection refused"))
    }

    async fn entity(&self, _id: &str) -> Result<Option<GraphEntity>> {
        Err(AnalysisError::graph("connection refused"))
    }

    async fn outgoing(&self, _id: &str) -> Result<Vec<GraphRelation>> {
        Err(AnalysisError::graph("connection refused"))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
