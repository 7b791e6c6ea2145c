//! Google Programmable Search client

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};

use super::search::SearchProvider;

const ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Returned when a search yields no snippets
pub const NO_RESULT: &str = "No good Google Search Result was found";

/// Google Custom Search JSON API client
pub struct GoogleSearch {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
    num_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    snippet: Option<String>,
}

impl GoogleSearch {
    /// Create a new client, reading credentials from the configured variables
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let read = |var: &str| {
            std::env::var(var)
                .map_err(|_| Error::Config(format!("{} environment variable not set", var)))
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: read(&config.api_key_env)?,
            cse_id: read(&config.cse_id_env)?,
            num_results: config.num_results,
        })
    }
}

/// Join result snippets into one observation
fn join_snippets(items: Vec<SearchItem>) -> String {
    let snippets: Vec<String> = items.into_iter().filter_map(|i| i.snippet).collect();
    if snippets.is_empty() {
        NO_RESULT.to_string()
    } else {
        snippets.join(" ")
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    async fn search(&self, query: &str) -> Result<String> {
        let num = self.num_results.to_string();
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Search(format!("Google request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Google search failed ({}): {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Failed to parse Google response: {}", e)))?;

        Ok(join_snippets(parsed.items))
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_snippets() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"items": [{"snippet": "Rust 1.80 released."}, {"title": "no snippet"}, {"snippet": "LazyLock stabilized."}]}"#,
        )
        .unwrap();
        assert_eq!(join_snippets(parsed.items), "Rust 1.80 released. LazyLock stabilized.");
    }

    #[test]
    fn test_no_items() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert_eq!(join_snippets(parsed.items), NO_RESULT);
    }
}
