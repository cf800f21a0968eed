//! Vector retriever: embed a prefix of the case text and query the index.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::retrieval::char_prefix;
use crate::traits::embedding::EmbeddingService;
use crate::traits::vector::{VectorFilter, VectorIndex};
use crate::types::config::RetrievalConfig;
use crate::types::retrieval::VectorHit;
use crate::types::state::LegalMatter;

/// Similarity search over embedded precedent passages.
#[derive(Clone)]
pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
}

impl VectorRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingService>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Top passages for `text`, highest similarity first.
    ///
    /// When `legal_matter` is given and the config filters by matter, only
    /// passages filed under that matter are returned.
    pub async fn retrieve(
        &self,
        text: &str,
        legal_matter: Option<LegalMatter>,
        config: &RetrievalConfig,
    ) -> Result<Vec<VectorHit>> {
        let query = char_prefix(text, config.embed_prefix_chars);
        let embedding = self.embedder.embed(query).await?;

        let mut filter = VectorFilter::new();
        if config.filter_by_legal_matter {
            if let Some(matter) = legal_matter {
                filter = filter.with_category(matter.as_str());
            }
        }
        if let Some(threshold) = config.min_similarity {
            filter = filter.with_min_score(threshold);
        }

        let hits = self
            .index
            .query(&embedding, config.vector_limit, &filter)
            .await?;

        debug!(
            query_chars = query.chars().count(),
            category = filter.category.as_deref().unwrap_or("any"),
            hits = hits.len(),
            "Vector retrieval complete"
        );
        Ok(hits)
    }
}
