//! Summarize or explain a web page

use std::sync::Arc;

use crate::error::Result;
use crate::generation::{remove_empty_lines, PromptBuilder, SummaryStyle};
use crate::ingestion::TextPipeline;
use crate::providers::{ChatRequest, LlmProvider};
use crate::timing::timed;
use crate::types::{ChatModel, Document};

/// Fetch, chunk and "stuff" a page into one summarization call
pub struct SummarizeChain {
    text: Arc<TextPipeline>,
    llm: Arc<dyn LlmProvider>,
}

impl SummarizeChain {
    /// Create a new chain
    pub fn new(text: Arc<TextPipeline>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { text, llm }
    }

    /// Summarize the page at `url`
    pub async fn run(
        &self,
        url: &str,
        style: SummaryStyle,
        temperature: Option<f32>,
        model: ChatModel,
    ) -> Result<(String, f64)> {
        let name = match style {
            SummaryStyle::Bullets => "summarize_url",
            SummaryStyle::Eli5 => "eli5_url",
        };
        let (result, elapsed) = timed(name, async {
            let chunks = self.text.fetch_and_chunk(url, model).await?;
            self.summarize(&chunks, style, temperature, model).await
        })
        .await;
        Ok((result?, elapsed))
    }

    /// One chat call over all chunks
    pub async fn summarize(
        &self,
        chunks: &[Document],
        style: SummaryStyle,
        temperature: Option<f32>,
        model: ChatModel,
    ) -> Result<String> {
        let text = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages = PromptBuilder::build_summary_messages(style, &text);
        let request = ChatRequest::new(model, messages, temperature);
        let response = self.llm.chat(&request).await?;
        tracing::info!("Summary received ({} chars), temperature: {:?}", response.len(), temperature);

        Ok(remove_empty_lines(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelsConfig;
    use crate::ingestion::{testing::WordEncoder, PageFetcher, TokenSplitter, TokenizerRegistry};
    use crate::providers::Role;
    use crate::testing::ScriptedLlm;

    fn chain(llm: Arc<ScriptedLlm>) -> SummarizeChain {
        let mut registry = TokenizerRegistry::new(ModelsConfig::default());
        registry.register("cl100k_base", Arc::new(WordEncoder::default()));
        let text = TextPipeline::new(
            PageFetcher::new().unwrap(),
            Arc::new(registry),
            TokenSplitter::new(4000, 200).unwrap(),
        );
        SummarizeChain::new(Arc::new(text), llm)
    }

    #[tokio::test]
    async fn test_summarize_stuffs_chunks() {
        let llm = Arc::new(ScriptedLlm::new(["- one\n\n- two\n   \n"]));
        let chain = chain(llm.clone());
        let chunks = vec![Document::new("first part"), Document::new("second part")];

        let summary = chain
            .summarize(&chunks, SummaryStyle::Bullets, Some(0.2), ChatModel::Gpt35Turbo)
            .await
            .unwrap();
        assert_eq!(summary, "- one\n- two");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert!(requests[0].messages[1].content.contains("first part\n\nsecond part"));
        assert!(requests[0].messages[1].content.contains("bullet points"));
    }

    #[tokio::test]
    async fn test_unreachable_url_fails() {
        let llm = Arc::new(ScriptedLlm::new(["unused"]));
        let err = chain(llm.clone())
            .run("http://127.0.0.1:9/page", SummaryStyle::Eli5, None, ChatModel::Gpt35Turbo)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::error::Error::Fetch { .. }));
        assert!(llm.requests().is_empty());
    }
}
