//! Entity/relation graph types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node of the legal knowledge graph (statute, precedent, party, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEntity {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl GraphEntity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type: entity_type.into(),
            content: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Case-insensitive substring match over name and content.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .content
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
    }
}

/// A directed, weighted edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelation {
    pub source_id: String,
    pub target_id: String,
    pub relation_type: String,
    pub weight: f64,
}

impl GraphRelation {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation_type: relation_type.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// An entity reached by traversal, with its depth and the path to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalHit {
    pub entity: GraphEntity,

    /// 0 for the start entity, +1 per hop
    pub depth: usize,

    /// Entity ids from the start to this entity (inclusive on both ends)
    pub path: Vec<String>,
}
