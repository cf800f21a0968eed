//! Storage implementations for the retrieval capabilities.
//!
//! Available backends:
//! - `MemoryVectorIndex` - In-memory similarity index (always available)
//! - `MemoryGraphStore` - In-memory entity/relation graph (always available)
//!
//! Production deployments implement [`VectorIndex`](crate::traits::VectorIndex)
//! and [`GraphStore`](crate::traits::GraphStore) over their own database.

pub mod memory;

pub use memory::{MemoryGraphStore, MemoryVectorIndex};
