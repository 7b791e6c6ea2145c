//! OpenAI client for chat completions and embeddings
//!
//! Works against any OpenAI-compatible base URL. Requests are sent once;
//! failures surface to the caller without retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::{ChatMessage, ChatRequest, LlmProvider};

/// OpenAI API client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    embed_model: String,
}

impl OpenAiClient {
    /// Create a new client, reading the API key from the configured variable
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var(&llm.api_key_env).map_err(|_| {
            Error::Config(format!("{} environment variable not set", llm.api_key_env))
        })?;
        Self::with_api_key(llm, embeddings, api_key)
    }

    /// Create a new client with an explicit API key
    pub fn with_api_key(
        llm: &LlmConfig,
        embeddings: &EmbeddingConfig,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            embed_model: embeddings.model.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'static str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

impl<'a> From<&'a ChatRequest> for CompletionBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            model: request.model.id(),
            messages: &request.messages,
            temperature: request.temperature,
            stop: &request.stop,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingBody<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Put embeddings back into input order
fn ordered_embeddings(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(Error::embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            "Chat completion: model={}, messages={}, temperature={:?}",
            request.model,
            request.messages.len(),
            request.temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionBody::from(request))
            .send()
            .await
            .map_err(|e| Error::llm(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "OpenAI chat completion failed ({}): {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse OpenAI response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::llm("No content in OpenAI response"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::embedding("No embedding in OpenAI response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingBody {
                model: &self.embed_model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| Error::embedding(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "OpenAI embedding failed ({}): {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse OpenAI response: {}", e)))?;

        ordered_embeddings(parsed.data, texts.len())
    }

    fn model(&self) -> &str {
        &self.embed_model
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatModel;

    #[test]
    fn test_body_omits_unset_temperature() {
        let request = ChatRequest::new(ChatModel::Gpt4, vec![ChatMessage::user("hi")], None);
        let json = serde_json::to_value(CompletionBody::from(&request)).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("temperature").is_none());
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_body_carries_temperature_and_stop() {
        let request = ChatRequest::new(
            ChatModel::Gpt35Turbo,
            vec![ChatMessage::system("s"), ChatMessage::user("u")],
            Some(0.5),
        )
        .with_stop(["\nObservation:"]);
        let json = serde_json::to_value(CompletionBody::from(&request)).unwrap();

        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["stop"][0], "\nObservation:");
        assert_eq!(json["messages"][0]["role"], "system");
    }

    #[test]
    fn test_embeddings_sorted_by_index() {
        let data = vec![
            EmbeddingData { embedding: vec![2.0], index: 1 },
            EmbeddingData { embedding: vec![1.0], index: 0 },
        ];
        let ordered = ordered_embeddings(data, 2).unwrap();
        assert_eq!(ordered, vec![vec![1.0], vec![2.0]]);

        assert!(ordered_embeddings(Vec::new(), 1).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let llm = LlmConfig {
            base_url: "http://localhost:1234/v1/".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::with_api_key(&llm, &EmbeddingConfig::default(), "k").unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/v1");
        assert_eq!(EmbeddingProvider::model(&client), "text-embedding-ada-002");
    }
}
