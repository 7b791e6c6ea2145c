//! Web search provider trait

use async_trait::async_trait;
use crate::error::Result;

/// Trait for web search backends used by the search agent
///
/// Implementations:
/// - `GoogleSearch`: Google Programmable Search (Custom Search JSON API)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web and return the result snippets as one string
    async fn search(&self, query: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
