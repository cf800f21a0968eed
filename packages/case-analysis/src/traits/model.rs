//! Model invocation trait.
//!
//! The pipeline never talks to a provider SDK directly: every completion
//! goes through a [`ModelInvoker`] keyed by [`ModelTier`]. Implementations
//! must be safe to share across concurrently running cases.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Capability tier a case is analyzed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Fast/cheap model without extended reasoning
    Fast,
    /// General-purpose model
    Standard,
    /// Most capable model, used with large reasoning budgets
    Premium,
}

impl ModelTier {
    pub const ALL: [ModelTier; 3] = [ModelTier::Fast, ModelTier::Standard, ModelTier::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Standard => "standard",
            ModelTier::Premium => "premium",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,

    /// Tokens granted for extended reasoning before answering
    pub reasoning_budget: Option<u32>,

    /// Output token cap
    pub max_tokens: Option<u32>,
}

impl ModelRequest {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_reasoning_budget(mut self, budget: Option<u32>) -> Self {
        self.reasoning_budget = budget;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Completion text plus token accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

impl ModelResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_in: 0,
            tokens_out: 0,
        }
    }

    pub fn with_usage(mut self, tokens_in: u64, tokens_out: u64) -> Self {
        self.tokens_in = tokens_in;
        self.tokens_out = tokens_out;
        self
    }
}

/// Invokes a language model at a given tier.
///
/// May fail on timeout, rate limiting, or authentication; the pipeline
/// does not retry.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse>;
}

#[async_trait]
impl<T: ModelInvoker + ?Sized> ModelInvoker for Arc<T> {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse> {
        (**self).invoke(tier, request).await
    }
}

/// Routes each tier to its own invoker.
///
/// Lets the fast tier run on one provider while standard and premium run
/// on another.
pub struct TieredInvoker {
    fast: Arc<dyn ModelInvoker>,
    standard: Arc<dyn ModelInvoker>,
    premium: Arc<dyn ModelInvoker>,
}

impl TieredInvoker {
    /// Use one invoker for every tier.
    pub fn uniform(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            fast: Arc::clone(&invoker),
            standard: Arc::clone(&invoker),
            premium: invoker,
        }
    }

    /// Override the invoker for one tier.
    pub fn with_tier(mut self, tier: ModelTier, invoker: Arc<dyn ModelInvoker>) -> Self {
        match tier {
            ModelTier::Fast => self.fast = invoker,
            ModelTier::Standard => self.standard = invoker,
            ModelTier::Premium => self.premium = invoker,
        }
        self
    }

    fn for_tier(&self, tier: ModelTier) -> &Arc<dyn ModelInvoker> {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Standard => &self.standard,
            ModelTier::Premium => &self.premium,
        }
    }
}

#[async_trait]
impl ModelInvoker for TieredInvoker {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse> {
        self.for_tier(tier).invoke(tier, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[tokio::test]
    async fn test_tiered_invoker_routes_by_tier() {
        let cheap = Arc::new(MockModel::new().with_response(ModelTier::Fast, "cheap"));
        let strong = Arc::new(MockModel::new().with_response(ModelTier::Premium, "strong"));

        let invoker = TieredInvoker::uniform(cheap.clone())
            .with_tier(ModelTier::Premium, strong.clone());

        let fast = invoker
            .invoke(ModelTier::Fast, ModelRequest::new("q"))
            .await
            .unwrap();
        let premium = invoker
            .invoke(ModelTier::Premium, ModelRequest::new("q"))
            .await
            .unwrap();

        assert_eq!(fast.text, "cheap");
        assert_eq!(premium.text, "strong");
        assert_eq!(cheap.calls().len(), 1);
        assert_eq!(strong.calls().len(), 1);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ModelTier::Fast < ModelTier::Standard);
        assert!(ModelTier::Standard < ModelTier::Premium);
    }
}
