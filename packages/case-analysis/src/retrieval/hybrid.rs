//! Concurrent vector + graph retrieval fused into one ranking.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::retrieval::fusion::fusion_rrf;
use crate::retrieval::graph::GraphRetriever;
use crate::retrieval::vector::VectorRetriever;
use crate::traits::embedding::EmbeddingService;
use crate::traits::graph::GraphStore;
use crate::traits::vector::VectorIndex;
use crate::types::config::RetrievalConfig;
use crate::types::state::{LegalMatter, RetrievalContext};

/// Runs both retrievers concurrently and fuses their rankings.
#[derive(Clone)]
pub struct HybridRetriever {
    vector: VectorRetriever,
    graph: GraphRetriever,
}

impl HybridRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        graph: Arc<dyn GraphStore>,
    ) -> Self {
        Self {
            vector: VectorRetriever::new(embedder, index),
            graph: GraphRetriever::new(graph),
        }
    }

    /// Retrieve context for `text`.
    ///
    /// Fails if either retriever fails; callers decide whether that is
    /// fatal.
    pub async fn retrieve(
        &self,
        text: &str,
        legal_matter: Option<LegalMatter>,
        config: &RetrievalConfig,
    ) -> Result<RetrievalContext> {
        let (vector_hits, graph_hits) = futures::try_join!(
            self.vector.retrieve(text, legal_matter, config),
            self.graph.retrieve(text, config),
        )?;

        let lists = [
            vector_hits.iter().map(|h| h.to_ranked()).collect::<Vec<_>>(),
            graph_hits.iter().map(|h| h.to_ranked()).collect::<Vec<_>>(),
        ];
        let fused = fusion_rrf(&lists, config.rrf_k);

        debug!(
            vector_hits = vector_hits.len(),
            graph_hits = graph_hits.len(),
            fused = fused.len(),
            rrf_k = config.rrf_k,
            "Hybrid retrieval complete"
        );

        Ok(RetrievalContext {
            vector_hits,
            graph_hits,
            fused,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{MemoryGraphStore, MemoryVectorIndex};
    use crate::testing::{FailingGraphStore, MockEmbedder};
    use crate::types::graph::GraphEntity;
    use crate::types::retrieval::{GRAPH_SOURCE, VECTOR_SOURCE};

    const CASE: &str = "juros abusivos";

    async fn retriever_with(graph: Arc<dyn GraphStore>) -> HybridRetriever {
        let embedder = Arc::new(MockEmbedder::new());
        let index = Arc::new(MemoryVectorIndex::new());
        let matching = embedder.embed(CASE).await.unwrap();
        let unrelated = embedder.embed("other").await.unwrap();
        index.insert("p1", "precedent on juros abusivos", "civil", "stj", matching);
        index.insert("p2", "unrelated precedent", "civil", "stj", unrelated);
        HybridRetriever::new(embedder, index, graph)
    }

    #[tokio::test]
    async fn test_fuses_both_sources() {
        let graph = MemoryGraphStore::new();
        graph.add_entity(
            GraphEntity::new("s382", "Sumula 382", "precedent")
                .with_content("juros abusivos e taxa media"),
        );
        let retriever = retriever_with(Arc::new(graph)).await;

        let context = retriever
            .retrieve(CASE, Some(LegalMatter::Civil), &RetrievalConfig::default())
            .await
            .unwrap();

        assert_eq!(context.vector_hits.len(), 2);
        assert_eq!(context.graph_hits.len(), 1);
        assert_eq!(context.fused.len(), 3);

        // The two rank-0 items tie at the top.
        assert_eq!(context.fused[0].score, 1.0);
        assert_eq!(context.fused[1].score, 1.0);
        let top_sources: Vec<_> = context.fused[..2].iter().map(|r| r.source.as_str()).collect();
        assert!(top_sources.contains(&VECTOR_SOURCE));
        assert!(top_sources.contains(&GRAPH_SOURCE));
        assert_eq!(context.fused[2].id, "p2");
    }

    #[tokio::test]
    async fn test_either_failure_fails_the_whole_retrieval() {
        let retriever = retriever_with(Arc::new(FailingGraphStore)).await;
        let result = retriever
            .retrieve(CASE, None, &RetrievalConfig::default())
            .await;
        assert!(result.is_err());
    }
}
