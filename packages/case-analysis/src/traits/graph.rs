//! Graph store trait for the legal entity/relation graph.
//!
//! Stores only answer point lookups (keyword search, entity by id,
//! outgoing edges). Multi-hop traversal is done by the crate itself in
//! [`crate::retrieval::traversal`], so it works the same on any backend.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::retrieval::traversal;
use crate::types::graph::{GraphEntity, GraphRelation, TraversalHit};

/// Read access to a directed entity/relation graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Entities whose name or content contains `keyword`
    /// (case-insensitive), ordered by name, at most `limit`.
    ///
    /// When `entity_types` is non-empty only those types are returned.
    async fn keyword_search(
        &self,
        keyword: &str,
        limit: usize,
        entity_types: &[String],
    ) -> Result<Vec<GraphEntity>>;

    /// Look up one entity by id.
    async fn entity(&self, id: &str) -> Result<Option<GraphEntity>>;

    /// Outgoing relations of an entity.
    async fn outgoing(&self, id: &str) -> Result<Vec<GraphRelation>>;

    /// Entities reachable from `start_id` within `max_depth` hops.
    ///
    /// The start entity is included at depth 0. No returned path repeats
    /// an id.
    async fn traverse(&self, start_id: &str, max_depth: usize) -> Result<Vec<TraversalHit>> {
        traversal::traverse(self, start_id, max_depth).await
    }
}

#[async_trait]
impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    async fn keyword_search(
        &self,
        keyword: &str,
        limit: usize,
        entity_types: &[String],
    ) -> Result<Vec<GraphEntity>> {
        (**self).keyword_search(keyword, limit, entity_types).await
    }

    async fn entity(&self, id: &str) -> Result<Option<GraphEntity>> {
        (**self).entity(id).await
    }

    async fn outgoing(&self, id: &str) -> Result<Vec<GraphRelation>> {
        (**self).outgoing(id).await
    }

    async fn traverse(&self, start_id: &str, max_depth: usize) -> Result<Vec<TraversalHit>> {
        (**self).traverse(start_id, max_depth).await
    }
}
