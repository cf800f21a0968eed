//! Typed errors for the case analysis library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failing collaborator.

use thiserror::Error;

/// Errors that can occur while analyzing a case.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Model invocation failed (timeout, rate limit, auth, transport)
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Vector index query failed
    #[error("vector index error: {0}")]
    VectorIndex(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Graph store query failed
    #[error("graph store error: {0}")]
    Graph(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Model output could not be interpreted
    #[error("invalid model response: {reason}")]
    InvalidResponse { reason: String },

    /// A stage ran before the field it depends on was produced
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Configuration error
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl AnalysisError {
    /// Build a model error from any displayable message.
    pub fn model(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Model(message.into())
    }

    /// Build an embedding error from any displayable message.
    pub fn embedding(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Embedding(message.into())
    }

    /// Build a vector index error from any displayable message.
    pub fn vector_index(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::VectorIndex(message.into())
    }

    /// Build a graph store error from any displayable message.
    pub fn graph(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Graph(message.into())
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_source_message() {
        let err = AnalysisError::model("rate limited");
        assert_eq!(err.to_string(), "model error: rate limited");

        let err = AnalysisError::MissingField {
            field: "router_result",
        };
        assert_eq!(err.to_string(), "missing required field: router_result");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: AnalysisError = parse.unwrap_err().into();
        assert!(matches!(err, AnalysisError::JsonParse(_)));
    }
}
