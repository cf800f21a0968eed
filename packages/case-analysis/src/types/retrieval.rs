//! Retrieval result types: per-source hits and fused results.

use serde::{Deserialize, Serialize};

use crate::types::graph::TraversalHit;

/// Source tag for hits coming from the vector index.
pub const VECTOR_SOURCE: &str = "vector";

/// Source tag for hits coming from the entity graph.
pub const GRAPH_SOURCE: &str = "graph";

/// An item from one ranked source, best-first within its list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub id: String,
    pub content: String,
    pub score: f64,
    pub source: String,
}

impl RankedItem {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        score: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            source: source.into(),
        }
    }
}

/// One entry of the fused ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: String,
    pub content: String,

    /// Normalized RRF score in [0, 1]; the top result is 1.0
    pub score: f64,

    /// Source tag of the list the item was first seen in
    pub source: String,

    /// Every source tag the item appeared under, in first-seen order
    pub sources: Vec<String>,
}

/// A passage returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    pub content: String,

    /// Cosine similarity to the query embedding
    pub score: f64,

    /// Legal matter category the passage is filed under
    pub category: String,

    /// Where the passage came from (court, collection, ...)
    pub source: String,
}

impl VectorHit {
    pub fn to_ranked(&self) -> RankedItem {
        RankedItem::new(&self.id, &self.content, self.score, VECTOR_SOURCE)
    }
}

/// An entity returned by graph retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphHit {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub content: String,

    /// Uniform: graph hits are treated as already relevance-ordered
    pub score: f64,

    /// Hops from the traversal start (0 for keyword hits)
    pub depth: usize,

    /// Entity ids from the traversal start to this entity
    pub path: Vec<String>,
}

impl GraphHit {
    /// Score assigned to every graph hit.
    pub const UNIFORM_SCORE: f64 = 1.0;

    pub fn to_ranked(&self) -> RankedItem {
        RankedItem::new(&self.id, &self.content, self.score, GRAPH_SOURCE)
    }
}

impl From<TraversalHit> for GraphHit {
    fn from(hit: TraversalHit) -> Self {
        Self {
            id: hit.entity.id,
            name: hit.entity.name,
            entity_type: hit.entity.entity_type,
            content: hit.entity.content.unwrap_or_default(),
            score: Self::UNIFORM_SCORE,
            depth: hit.depth,
            path: hit.path,
        }
    }
}
