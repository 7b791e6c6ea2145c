//! Page fetching and HTML to text conversion

use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Error, Result};

/// Elements whose text never reaches the model
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Fetches web pages as plain text
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Create a new fetcher
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("discord-llm-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Download `url` and return its visible text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::fetch(url, format!("status {}", response.status())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        Ok(html_to_text(&html))
    }
}

fn newline_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").expect("valid regex"))
}

/// Strip markup and collapse runs of newlines to one
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if !skipped {
            text.push_str(fragment);
        }
    }

    newline_runs().replace_all(&text, "\n").into_owned()
}
