//! Wiring of the pipelines behind the commands

use std::sync::Arc;

use crate::chains::{SearchAgent, SqlAgent, SqlChain, SummarizeChain};
use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::ingestion::{PageFetcher, TextPipeline, TokenSplitter, TokenizerRegistry};
use crate::providers::{GoogleSearch, OpenAiClient, PineconeIndex, VectorIndex};
use crate::retrieval::QaPipeline;
use crate::storage::BooksDatabase;
use crate::types::IndexSelector;

/// Pipelines behind the commands; a missing one makes its commands fail
#[derive(Default, Clone)]
pub struct Services {
    pub qa: Option<Arc<QaPipeline>>,
    pub summarize: Option<Arc<SummarizeChain>>,
    pub search: Option<Arc<SearchAgent>>,
    pub sql_chain: Option<Arc<SqlChain>>,
    pub sql_agent: Option<Arc<SqlAgent>>,
}

impl Services {
    /// Build every pipeline the configuration and environment allow
    ///
    /// A pipeline whose credentials or files are missing is left out with a
    /// warning; the rest of the bot keeps working.
    pub async fn from_config(config: &BotConfig) -> Self {
        let openai = match OpenAiClient::new(&config.llm, &config.embeddings) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::warn!("Language model unavailable, every LLM command is disabled: {}", e);
                return Self::default();
            }
        };

        let summarize = match build_text_pipeline(config) {
            Ok(text) => Some(Arc::new(SummarizeChain::new(Arc::new(text), openai.clone()))),
            Err(e) => {
                tracing::warn!("Summarization disabled: {}", e);
                None
            }
        };

        let mut qa = QaPipeline::new(openai.clone(), openai.clone());
        let mut bound = 0;
        for selector in [IndexSelector::Ey, IndexSelector::Board] {
            let index_config = config.indexes.get(selector);
            match PineconeIndex::connect(index_config).await {
                Ok(index) => {
                    log_index_stats(&index).await;
                    qa = qa.with_index(selector, Arc::new(index), index_config.top_k);
                    bound += 1;
                }
                Err(e) => tracing::warn!("Index '{}' unavailable: {}", index_config.name, e),
            }
        }
        let qa = (bound > 0).then(|| Arc::new(qa));

        let search = match GoogleSearch::new(&config.search) {
            Ok(google) => Some(Arc::new(SearchAgent::new(
                openai.clone(),
                Arc::new(google),
                config.search.max_iterations,
            ))),
            Err(e) => {
                tracing::warn!("Web search disabled: {}", e);
                None
            }
        };

        let (sql_chain, sql_agent) = match BooksDatabase::open(&config.sql.database_path) {
            Ok(db) => (
                Some(Arc::new(SqlChain::new(db.clone(), openai.clone(), config.sql.chain_top_k))),
                Some(Arc::new(SqlAgent::new(
                    db,
                    openai.clone(),
                    config.sql.agent_top_k,
                    config.sql.max_iterations,
                ))),
            ),
            Err(e) => {
                tracing::warn!("SQL commands disabled: {}", e);
                (None, None)
            }
        };

        Self {
            qa,
            summarize,
            search,
            sql_chain,
            sql_agent,
        }
    }
}

fn build_text_pipeline(config: &BotConfig) -> Result<TextPipeline> {
    let tokenizers = TokenizerRegistry::from_config(config)?;
    let splitter = TokenSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
    Ok(TextPipeline::new(PageFetcher::new()?, Arc::new(tokenizers), splitter))
}

async fn log_index_stats(index: &PineconeIndex) {
    match index.describe().await {
        Ok(stats) => tracing::info!(
            "Index '{}': {} vectors of dimension {}",
            index.name(),
            stats.total_vector_count,
            stats.dimension
        ),
        Err(e) => tracing::warn!("Could not describe index '{}': {}", index.name(), e),
    }
}

/// Fail with a configuration error when `service` is missing
pub(crate) fn require<'a, T>(service: &'a Option<Arc<T>>, name: &str) -> Result<&'a T> {
    service
        .as_deref()
        .ok_or_else(|| Error::Config(format!("{} is not configured", name)))
}
