//! Text acquisition: page fetching, token budgeting and chunking

mod chunker;
mod fetch;
mod tokenizer;

use std::sync::Arc;

pub use chunker::TokenSplitter;
pub use fetch::{html_to_text, PageFetcher};
pub use tokenizer::{HfTokenizer, TokenEncoder, TokenizerRegistry};

#[cfg(test)]
pub(crate) use tokenizer::testing;

use crate::error::Result;
use crate::types::{ChatModel, Document};

/// Turns a URL into model-sized chunks
pub struct TextPipeline {
    fetcher: PageFetcher,
    tokenizers: Arc<TokenizerRegistry>,
    splitter: TokenSplitter,
}

impl TextPipeline {
    /// Create a new pipeline
    pub fn new(fetcher: PageFetcher, tokenizers: Arc<TokenizerRegistry>, splitter: TokenSplitter) -> Self {
        Self {
            fetcher,
            tokenizers,
            splitter,
        }
    }

    /// Fetch `url` and split its text into chunks for `model`
    pub async fn fetch_and_chunk(&self, url: &str, model: ChatModel) -> Result<Vec<Document>> {
        let text = self.fetcher.fetch_text(url).await?;
        self.chunk_text(&text, model)
    }

    /// Trim `text` to the model's input budget and split it into chunks
    ///
    /// Text already under budget is kept as is; longer text is cut on a
    /// token boundary.
    pub fn chunk_text(&self, text: &str, model: ChatModel) -> Result<Vec<Document>> {
        let encoder = self.tokenizers.encoder(model)?;
        let budget = self.tokenizers.profile(model).max_input_tokens;

        let ids = encoder.encode(text)?;
        let trimmed = if ids.len() > budget {
            encoder.decode(&ids[..budget])?
        } else {
            text.to_string()
        };
        tracing::info!(
            "Keeping {} of {} tokens for {}",
            ids.len().min(budget),
            ids.len(),
            model
        );

        let chunks: Vec<Document> = self
            .splitter
            .split(encoder.as_ref(), &trimmed)?
            .into_iter()
            .map(Document::new)
            .collect();
        tracing::info!("Split text into {} chunks", chunks.len());

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelsConfig;
    use crate::types::ModelProfile;
    use super::testing::WordEncoder;

    fn pipeline(max_input_tokens: usize, chunk_size: usize) -> TextPipeline {
        let models = ModelsConfig {
            gpt_35_turbo: ModelProfile::new("words", max_input_tokens),
            gpt_4: ModelProfile::new("words", max_input_tokens * 2),
        };
        let mut registry = TokenizerRegistry::new(models);
        registry.register("words", Arc::new(WordEncoder::default()));

        TextPipeline::new(
            PageFetcher::new().unwrap(),
            Arc::new(registry),
            TokenSplitter::new(chunk_size, 1).unwrap(),
        )
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("t{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_text_under_budget_is_untouched() {
        let text = "short\npage  with   spacing";
        let chunks = pipeline(100, 50).chunk_text(text, ChatModel::Gpt35Turbo).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert!(chunks[0].source().is_none());
    }

    #[test]
    fn test_text_over_budget_is_truncated() {
        let chunks = pipeline(10, 100)
            .chunk_text(&words(30), ChatModel::Gpt35Turbo)
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, words(10));
    }

    #[test]
    fn test_budget_follows_model_profile() {
        let chunks = pipeline(10, 100).chunk_text(&words(30), ChatModel::Gpt4).unwrap();
        assert_eq!(chunks[0].content.split_whitespace().count(), 20);
    }

    #[test]
    fn test_long_text_is_chunked() {
        let chunks = pipeline(100, 10)
            .chunk_text(&words(40), ChatModel::Gpt35Turbo)
            .unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.content.split_whitespace().count() <= 10));
    }
}
