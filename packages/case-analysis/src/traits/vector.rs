//! Vector index trait for similarity search over precedent passages.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::retrieval::VectorHit;

/// Filter applied to a similarity query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorFilter {
    /// Only passages filed under this category (legal matter).
    pub category: Option<String>,

    /// Only passages with cosine similarity at or above this value.
    pub min_score: Option<f64>,
}

impl VectorFilter {
    /// Create a new empty filter (matches all).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Check a candidate against the filter.
    pub fn matches(&self, category: &str, score: f64) -> bool {
        if let Some(wanted) = &self.category {
            if wanted != category {
                return false;
            }
        }
        self.min_score.map_or(true, |min| score >= min)
    }
}

/// Similarity index over embedded passages.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Top `limit` passages by cosine similarity, highest first.
    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorHit>>;
}

#[async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for Arc<T> {
    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorHit>> {
        (**self).query(embedding, limit, filter).await
    }
}

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_filter_category_and_threshold() {
        let filter = VectorFilter::new().with_category("civil").with_min_score(0.5);
        assert!(filter.matches("civil", 0.5));
        assert!(!filter.matches("civil", 0.49));
        assert!(!filter.matches("tax", 0.9));
        assert!(VectorFilter::new().matches("anything", -1.0));
    }
}
