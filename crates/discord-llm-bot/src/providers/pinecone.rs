//! Pinecone vector index (read-only)
//!
//! The index host is taken from configuration or resolved once through
//! the Pinecone controller for the configured environment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::types::{Document, DocumentMetadata};

use super::vector_store::{IndexStats, VectorIndex};

/// Client for a single Pinecone index
pub struct PineconeIndex {
    client: reqwest::Client,
    name: String,
    host: String,
    api_key: String,
    text_key: String,
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    project_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    id: String,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl PineconeIndex {
    /// Connect to the index described by `config`
    ///
    /// Reads the API key from `config.api_key_env` and resolves the host
    /// when none is configured.
    pub async fn connect(config: &IndexConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Config(format!("{} environment variable not set", config.api_key_env))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let host = match &config.host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => resolve_host(&client, config, &api_key).await?,
        };

        tracing::info!("Pinecone index '{}' at {}", config.name, host);

        Ok(Self::from_parts(client, config, host, api_key))
    }

    fn from_parts(client: reqwest::Client, config: &IndexConfig, host: String, api_key: String) -> Self {
        Self {
            client,
            name: config.name.clone(),
            host,
            api_key,
            text_key: config.text_key.clone(),
        }
    }

    fn to_document(&self, m: Match) -> Result<Document> {
        let mut metadata = m.metadata.unwrap_or_default();

        let content = match metadata.remove(&self.text_key) {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => {
                return Err(Error::missing_field(
                    self.text_key.clone(),
                    format!("metadata of match '{}' in index '{}'", m.id, self.name),
                ))
            }
        };

        let source = match metadata.remove("source") {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        tracing::debug!("Match '{}' score={:?}", m.id, m.score);

        Ok(Document {
            content,
            metadata: DocumentMetadata {
                source,
                extra: metadata.into_iter().collect(),
            },
        })
    }
}

async fn resolve_host(client: &reqwest::Client, config: &IndexConfig, api_key: &str) -> Result<String> {
    let url = format!("https://controller.{}.pinecone.io/actions/whoami", config.environment);

    let response = client
        .get(&url)
        .header("Api-Key", api_key)
        .send()
        .await
        .map_err(|e| Error::vector_db(format!("Pinecone whoami request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::vector_db(format!(
            "Pinecone whoami failed ({}): {}",
            status, body
        )));
    }

    let whoami: WhoAmI = response
        .json()
        .await
        .map_err(|e| Error::vector_db(format!("Failed to parse whoami response: {}", e)))?;

    Ok(index_host(&config.name, &whoami.project_name, &config.environment))
}

/// Data-plane host of an index
fn index_host(index: &str, project: &str, environment: &str) -> String {
    format!("https://{}-{}.svc.{}.pinecone.io", index, project, environment)
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Document>> {
        let url = format!("{}/query", self.host);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&QueryBody {
                vector,
                top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone query request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Pinecone query failed ({}): {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to parse Pinecone response: {}", e)))?;

        parsed
            .matches
            .into_iter()
            .take(top_k)
            .map(|m| self.to_document(m))
            .collect()
    }

    async fn describe(&self) -> Result<IndexStats> {
        let url = format!("{}/describe_index_stats", self.host);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::vector_db(format!("Pinecone stats request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!(
                "Pinecone describe_index_stats failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("Failed to parse index stats: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PineconeIndex {
        let config = IndexConfig {
            name: "ask-ey".to_string(),
            environment: "us-west4-gcp".to_string(),
            api_key_env: "UNUSED".to_string(),
            host: Some("http://localhost".to_string()),
            top_k: 4,
            text_key: "text".to_string(),
        };
        PineconeIndex::from_parts(
            reqwest::Client::new(),
            &config,
            "http://localhost".to_string(),
            "key".to_string(),
        )
    }

    #[test]
    fn test_index_host() {
        assert_eq!(
            index_host("ask-ey", "abc123", "us-west4-gcp"),
            "https://ask-ey-abc123.svc.us-west4-gcp.pinecone.io"
        );
    }

    #[test]
    fn test_match_to_document() {
        let json = r#"{"matches": [
            {"id": "1", "score": 0.9, "metadata": {"text": "Paris is the capital.", "source": "https://en.wikipedia.org/wiki/Paris", "title": "Paris"}},
            {"id": "2", "score": 0.8, "metadata": {"text": "No source here."}}
        ]}"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        let idx = index();
        let docs: Vec<Document> = parsed
            .matches
            .into_iter()
            .map(|m| idx.to_document(m).unwrap())
            .collect();

        assert_eq!(docs[0].content, "Paris is the capital.");
        assert_eq!(docs[0].source(), Some("https://en.wikipedia.org/wiki/Paris"));
        assert_eq!(docs[0].metadata.extra.get("title"), Some(&Value::from("Paris")));
        assert!(!docs[0].metadata.extra.contains_key("text"));
        assert_eq!(docs[1].source(), None);
    }

    #[test]
    fn test_missing_text_key() {
        let m = Match {
            id: "7".to_string(),
            score: None,
            metadata: None,
        };
        let err = index().to_document(m).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "text"));
    }

    #[test]
    fn test_query_body_is_camel_case() {
        let body = QueryBody {
            vector: &[0.1, 0.2],
            top_k: 4,
            include_metadata: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["topK"], 4);
        assert_eq!(json["includeMetadata"], true);
    }
}
