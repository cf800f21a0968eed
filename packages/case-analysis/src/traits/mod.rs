//! Core trait abstractions for the external capabilities the pipeline uses.

pub mod embedding;
pub mod graph;
pub mod model;
pub mod vector;

pub use embedding::EmbeddingService;
pub use graph::GraphStore;
pub use model::{ModelInvoker, ModelRequest, ModelResponse, ModelTier, TieredInvoker};
pub use vector::{cosine_similarity, VectorFilter, VectorIndex};
