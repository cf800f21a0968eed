//! Anthropic Messages API implementation of `ModelInvoker`.
//!
//! # Example
//!
//! ```rust,ignore
//! use case_analysis::providers::Anthropic;
//!
//! let anthropic = Anthropic::from_env()?.with_models(config.models.clone());
//! let workflow = Workflow::new(Arc::new(anthropic), embedder, index, graph);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::providers::credentials::ApiKey;
use crate::traits::model::{ModelInvoker, ModelRequest, ModelResponse, ModelTier};
use crate::types::config::ModelConfig;

const API_VERSION: &str = "2023-06-01";

/// Sampling temperature when extended thinking is off.
const TEMPERATURE: f32 = 0.3;

/// Default output cap when the request sets none.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic client mapping each tier to a configured model id.
///
/// A request with a reasoning budget enables extended thinking with that
/// budget; temperature is then omitted, which the API requires.
#[derive(Clone)]
pub struct Anthropic {
    client: Client,
    api_key: ApiKey,
    models: ModelConfig,
    base_url: String,
}

impl Anthropic {
    /// Create a new client with the given API key and default models.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            models: ModelConfig::default(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        }
    }

    /// Create from environment variable `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiKey::from_env("ANTHROPIC_API_KEY")?))
    }

    /// Set the model id used for each tier.
    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Set a custom base URL (for proxies, gateways, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, tier: ModelTier, request: ModelRequest) -> MessagesRequest {
        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let (thinking, temperature, max_tokens) = match request.reasoning_budget {
            Some(budget) => (
                Some(Thinking {
                    kind: "enabled",
                    budget_tokens: budget,
                }),
                None,
                // The budget counts against max_tokens, so leave room for the answer.
                budget.saturating_add(max_tokens),
            ),
            None => (None, Some(TEMPERATURE), max_tokens),
        };

        MessagesRequest {
            model: self.models.model_id(tier).to_string(),
            max_tokens,
            system: request.system_prompt,
            messages: vec![Message {
                role: "user",
                content: request.user_prompt,
            }],
            temperature,
            thinking,
        }
    }
}

#[async_trait]
impl ModelInvoker for Anthropic {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse> {
        let body = self.build_request(tier, request);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Model(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::model(format!(
                "Anthropic API error ({status}): {error_text}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Model(Box::new(e)))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(AnalysisError::InvalidResponse {
                reason: "Anthropic response had no text content".to_string(),
            });
        }

        Ok(ModelResponse::new(text)
            .with_usage(parsed.usage.input_tokens, parsed.usage.output_tokens))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<Thinking>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct Thinking {
    #[serde(rename = "type")]
    kind: &'static str,
    budget_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}
