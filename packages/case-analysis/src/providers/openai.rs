//! OpenAI implementation of `ModelInvoker` and `EmbeddingService`.
//!
//! Chat completions back the model tiers; `text-embedding-3-small` backs
//! vector retrieval. Any OpenAI-compatible gateway works through
//! [`OpenAI::with_base_url`].
//!
//! # Example
//!
//! ```rust,ignore
//! use case_analysis::providers::OpenAI;
//!
//! let openai = Arc::new(OpenAI::from_env()?);
//! let workflow = Workflow::new(openai.clone(), openai, index, graph);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::providers::credentials::ApiKey;
use crate::traits::embedding::EmbeddingService;
use crate::traits::model::{ModelInvoker, ModelRequest, ModelResponse, ModelTier};
use crate::types::config::ModelConfig;

const TEMPERATURE: f32 = 0.2;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// OpenAI-compatible client for completions and embeddings.
///
/// Chat completions have no extended-thinking budget; a reasoning budget
/// on the request is ignored.
#[derive(Clone)]
pub struct OpenAI {
    client: Client,
    api_key: ApiKey,
    models: ModelConfig,
    embedding_model: String,
    dimensions: usize,
    base_url: String,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            models: ModelConfig::default(),
            embedding_model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiKey::from_env("OPENAI_API_KEY")?))
    }

    /// Set the model id used for each tier.
    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Set the embedding model (default: text-embedding-3-small).
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the requested embedding dimension (default: 1536).
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the embedding dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn build_chat(&self, tier: ModelTier, request: ModelRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user_prompt,
        });

        ChatRequest {
            model: self.models.model_id(tier).to_string(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    async fn request_embeddings(&self, input: EmbeddingInput<'_>) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Embedding(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::embedding(format!(
                "OpenAI embeddings error ({status}): {error_text}"
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Embedding(Box::new(e)))?;

        parsed.data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(AnalysisError::embedding(format!(
                "expected {}-dimensional embeddings, got {}",
                self.dimensions,
                bad.len()
            )));
        }

        Ok(vectors)
    }
}

#[async_trait]
impl ModelInvoker for OpenAI {
    async fn invoke(&self, tier: ModelTier, request: ModelRequest) -> Result<ModelResponse> {
        let body = self.build_chat(tier, request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Model(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::model(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Model(Box::new(e)))?;

        let usage = chat.usage.unwrap_or_default();
        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalysisError::InvalidResponse {
                reason: "No response from OpenAI".to_string(),
            })?;

        Ok(ModelResponse::new(text).with_usage(usage.prompt_tokens, usage.completion_tokens))
    }
}

#[async_trait]
impl EmbeddingService for OpenAI {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request_embeddings(EmbeddingInput::One(text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::embedding("No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.request_embeddings(EmbeddingInput::Many(texts)).await?;
        if vectors.len() != texts.len() {
            return Err(AnalysisError::embedding(format!(
                "requested {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: EmbeddingInput<'a>,
    dimensions: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let openai = OpenAI::new("sk-test");
        assert_eq!(openai.dimensions(), 1536);
        assert_eq!(openai.embedding_model, "text-embedding-3-small");
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_builder_overrides() {
        let openai = OpenAI::new("sk-test")
            .with_embedding_model("text-embedding-3-large")
            .with_dimensions(3072)
            .with_base_url("http://localhost:8080/v1")
            .with_models(ModelConfig::default().with_model(ModelTier::Fast, "gpt-4o-mini"));

        assert_eq!(openai.dimensions(), 3072);
        assert_eq!(openai.embedding_model, "text-embedding-3-large");
        assert_eq!(openai.base_url, "http://localhost:8080/v1");
        assert_eq!(openai.models.model_id(ModelTier::Fast), "gpt-4o-mini");
    }

    #[test]
    fn test_chat_request_shape() {
        let openai = OpenAI::new("sk-test");
        let body = openai.build_chat(
            ModelTier::Fast,
            ModelRequest::new("classify this")
                .with_system("you are a router")
                .with_reasoning_budget(Some(10_000)),
        );
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gemini-2.5-flash");
        assert_eq!(value["max_tokens"], 4096);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "classify this"}));
        assert!(value.get("thinking").is_none());
    }

    #[test]
    fn test_chat_request_without_system_prompt() {
        let openai = OpenAI::new("sk-test");
        let body = openai.build_chat(ModelTier::Standard, ModelRequest::new("hi"));
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
    }

    #[test]
    fn test_embedding_input_serializes_single_and_batch() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let one = serde_json::to_value(EmbeddingRequest {
            model: "m",
            input: EmbeddingInput::One("a"),
            dimensions: 4,
        })
        .unwrap();
        let many = serde_json::to_value(EmbeddingRequest {
            model: "m",
            input: EmbeddingInput::Many(&texts),
            dimensions: 4,
        })
        .unwrap();

        assert_eq!(one["input"], json!("a"));
        assert_eq!(many["input"], json!(["a", "b"]));
    }

    #[test]
    fn test_chat_response_tolerates_missing_usage() {
        let chat: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}]
        }))
        .unwrap();
        assert!(chat.usage.is_none());
        assert_eq!(chat.choices[0].message.content.as_deref(), Some("{}"));
    }
}
