//! HTTP adapters for the model and embedding capabilities.
//!
//! Each adapter is behind a cargo feature:
//! - `anthropic` - [`Anthropic`] Messages API (`ModelInvoker`)
//! - `openai` - [`OpenAI`] chat completions and embeddings
//!   (`ModelInvoker` + `EmbeddingService`), also usable with any
//!   OpenAI-compatible endpoint
//!
//! Combine them per tier with [`TieredInvoker`](crate::traits::TieredInvoker).

#[cfg(any(feature = "anthropic", feature = "openai"))]
pub mod credentials;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "openai")]
mod openai;

#[cfg(any(feature = "anthropic", feature = "openai"))]
pub use credentials::ApiKey;

#[cfg(feature = "anthropic")]
pub use anthropic::Anthropic;

#[cfg(feature = "openai")]
pub use openai::OpenAI;
