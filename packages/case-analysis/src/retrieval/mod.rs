//! Hybrid retrieval: vector similarity plus graph traversal, merged by RRF.

pub mod fusion;
pub mod graph;
pub mod hybrid;
pub mod traversal;
pub mod vector;

pub use fusion::{fusion_rrf, DEFAULT_RRF_K};
pub use graph::GraphRetriever;
pub use hybrid::HybridRetriever;
pub use traversal::traverse;
pub use vector::VectorRetriever;

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
