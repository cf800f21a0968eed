//! In-memory storage implementations for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::traits::graph::GraphStore;
use crate::traits::vector::{cosine_similarity, VectorFilter, VectorIndex};
use crate::types::graph::{GraphEntity, GraphRelation};
use crate::types::retrieval::VectorHit;

struct StoredPassage {
    id: String,
    content: String,
    category: String,
    source: String,
    embedding: Vec<f32>,
}

/// In-memory similarity index over embedded passages.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart and every query is a full scan.
pub struct MemoryVectorIndex {
    passages: RwLock<Vec<StoredPassage>>,
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            passages: RwLock::new(Vec::new()),
        }
    }

    /// Add a passage, replacing any existing passage with the same id.
    pub fn insert(
        &self,
        id: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        source: impl Into<String>,
        embedding: Vec<f32>,
    ) {
        let passage = StoredPassage {
            id: id.into(),
            content: content.into(),
            category: category.into(),
            source: source.into(),
            embedding,
        };
        let mut passages = self.passages.write().unwrap_or_else(PoisonError::into_inner);
        passages.retain(|p| p.id != passage.id);
        passages.push(passage);
    }

    /// Get the number of stored passages.
    pub fn len(&self) -> usize {
        self.passages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorHit>> {
        let passages = self.passages.read().unwrap_or_else(PoisonError::into_inner);

        let mut hits: Vec<VectorHit> = passages
            .iter()
            .filter_map(|p| {
                let score = cosine_similarity(embedding, &p.embedding) as f64;
                filter.matches(&p.category, score).then(|| VectorHit {
                    id: p.id.clone(),
                    content: p.content.clone(),
                    score,
                    category: p.category.clone(),
                    source: p.source.clone(),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// In-memory directed entity/relation graph.
pub struct MemoryGraphStore {
    entities: RwLock<HashMap<String, GraphEntity>>,
    relations: RwLock<HashMap<String, Vec<GraphRelation>>>,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraphStore {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            relations: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace an entity.
    pub fn add_entity(&self, entity: GraphEntity) {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity.id.clone(), entity);
    }

    /// Add a directed edge. Endpoints need not exist yet.
    pub fn add_relation(&self, relation: GraphRelation) {
        self.relations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(relation.source_id.clone())
            .or_default()
            .push(relation);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn keyword_search(
        &self,
        keyword: &str,
        limit: usize,
        entity_types: &[String],
    ) -> Result<Vec<GraphEntity>> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);

        let mut matches: Vec<GraphEntity> = entities
            .values()
            .filter(|e| entity_types.is_empty() || entity_types.contains(&e.entity_type))
            .filter(|e| e.matches_keyword(keyword))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn entity(&self, id: &str) -> Result<Option<GraphEntity>> {
        Ok(self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    async fn outgoing(&self, id: &str) -> Result<Vec<GraphRelation>> {
        Ok(self
            .relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}
