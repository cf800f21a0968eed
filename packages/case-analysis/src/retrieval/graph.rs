//! Graph retriever: keyword lookup, then bounded expansion from the top hit.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::retrieval::char_prefix;
use crate::traits::graph::GraphStore;
use crate::types::config::RetrievalConfig;
use crate::types::retrieval::GraphHit;

/// Keyword search plus traversal over the legal entity graph.
#[derive(Clone)]
pub struct GraphRetriever {
    store: Arc<dyn GraphStore>,
}

impl GraphRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Graph hits for `text`: keyword matches first (by name), then
    /// entities reached from the top match (by depth, then name).
    ///
    /// Every hit carries the same score; the order is the ranking.
    pub async fn retrieve(&self, text: &str, config: &RetrievalConfig) -> Result<Vec<GraphHit>> {
        let keyword = char_prefix(text, config.graph_query_chars).trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .store
            .keyword_search(keyword, config.graph_limit, &config.entity_types)
            .await?;

        let mut seen: HashSet<String> = matches.iter().map(|e| e.id.clone()).collect();
        let start_id = matches
            .first()
            .filter(|_| config.expand_graph)
            .map(|e| e.id.clone());

        let mut hits: Vec<GraphHit> = matches
            .into_iter()
            .map(|entity| GraphHit {
                path: vec![entity.id.clone()],
                id: entity.id,
                name: entity.name,
                entity_type: entity.entity_type,
                content: entity.content.unwrap_or_default(),
                score: GraphHit::UNIFORM_SCORE,
                depth: 0,
            })
            .collect();
        let keyword_hits = hits.len();

        if let Some(start_id) = start_id {
            let reached = self
                .store
                .traverse(&start_id, config.traversal_depth)
                .await?;

            hits.extend(
                reached
                    .into_iter()
                    .filter(|hit| hit.depth > 0)
                    .filter(|hit| {
                        config.entity_types.is_empty()
                            || config.entity_types.contains(&hit.entity.entity_type)
                    })
                    .filter(|hit| seen.insert(hit.entity.id.clone()))
                    .take(config.traversal_limit)
                    .map(GraphHit::from),
            );
        }

        debug!(
            keyword_hits,
            expanded = hits.len() - keyword_hits,
            "Graph retrieval complete"
        );
        Ok(hits)
    }
}
