//! Retrieval-augmented question answering with sources
//!
//! One embedding call, one index query and one chat completion per
//! question. Nothing is retried and no partial result is returned.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{split_answer, PromptBuilder};
use crate::providers::{ChatMessage, ChatRequest, EmbeddingProvider, LlmProvider, VectorIndex};
use crate::timing::timed;
use crate::types::{ChatModel, IndexSelector, RetrievalResult};

/// An index together with the number of documents retrieved from it
#[derive(Clone)]
pub struct BoundIndex {
    pub index: Arc<dyn VectorIndex>,
    pub top_k: usize,
}

/// QA pipeline over the configured vector indexes
pub struct QaPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    indexes: HashMap<IndexSelector, BoundIndex>,
}

impl QaPipeline {
    /// Create a pipeline with no indexes bound
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            embedder,
            llm,
            indexes: HashMap::new(),
        }
    }

    /// Bind an index to a selector
    pub fn with_index(mut self, selector: IndexSelector, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        self.indexes.insert(selector, BoundIndex { index, top_k });
        self
    }

    /// Answer `question` from the selected index
    ///
    /// Returns the result and the wall-clock seconds spent.
    pub async fn answer(
        &self,
        question: &str,
        temperature: Option<f32>,
        model: ChatModel,
        selector: IndexSelector,
    ) -> Result<(RetrievalResult, f64)> {
        let (result, elapsed) = timed(
            &format!("qa_{}", selector.label()),
            self.run(question, temperature, model, selector),
        )
        .await;
        Ok((result?, elapsed))
    }

    async fn run(
        &self,
        question: &str,
        temperature: Option<f32>,
        model: ChatModel,
        selector: IndexSelector,
    ) -> Result<RetrievalResult> {
        let bound = self.indexes.get(&selector).ok_or_else(|| {
            Error::Config(format!("No vector index bound for '{}'", selector.label()))
        })?;

        let vector = self.embedder.embed(question).await?;
        let source_documents = bound.index.query(&vector, bound.top_k).await?;
        tracing::info!(
            "Retrieved {} documents from '{}'",
            source_documents.len(),
            bound.index.name()
        );

        let prompt = PromptBuilder::build_qa_prompt(question, &source_documents);
        tracing::debug!("QA prompt: {}", prompt);

        let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)], temperature);
        let output = self.llm.chat(&request).await?;
        let (answer, sources) = split_answer(&output);

        Ok(RetrievalResult {
            question: question.to_string(),
            answer,
            sources,
            source_documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::format_qa;
    use crate::testing::{FailingEmbedder, FakeEmbedder, FakeIndex, ScriptedLlm};
    use crate::types::Document;

    fn france() -> Vec<Document> {
        vec![
            Document::with_source("Paris is the capital of France.", "http://a.test"),
            Document::with_source("France is in Europe.", "http://b.test"),
        ]
    }

    fn pipeline(index: Arc<FakeIndex>, llm: Arc<ScriptedLlm>, top_k: usize) -> QaPipeline {
        QaPipeline::new(Arc::new(FakeEmbedder), llm).with_index(IndexSelector::Ey, index, top_k)
    }

    #[tokio::test]
    async fn test_answer_and_format() {
        let index = Arc::new(FakeIndex::new(france()));
        let llm = Arc::new(ScriptedLlm::new(["Paris\nSOURCES: http://a.test"]));
        let qa = pipeline(index, llm.clone(), 4);

        let (result, elapsed) = qa
            .answer("What is the capital of France?", Some(0.0), ChatModel::Gpt35Turbo, IndexSelector::Ey)
            .await
            .unwrap();

        assert!(elapsed >= 0.0);
        assert_eq!(result.answer, "Paris");
        assert_eq!(result.sources, "http://a.test");
        assert_eq!(result.source_documents, france());

        let blocks = format_qa(&result).unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("Answer: Paris"));
        assert!(blocks[0].contains("<http://a.test>"));
        assert!(blocks[1].contains("Paris is the capital of France.") && blocks[1].contains("<http://a.test>"));
        assert!(blocks[2].contains("France is in Europe.") && blocks[2].contains("<http://b.test>"));

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert!(requests[0].messages[0].content.contains("Paris is the capital of France."));
    }

    #[tokio::test]
    async fn test_top_k_and_rank_order() {
        let docs: Vec<Document> = (0..6)
            .map(|i| Document::with_source(format!("doc {}", i), format!("http://{}.test", i)))
            .collect();
        let index = Arc::new(FakeIndex::new(docs.clone()));
        let llm = Arc::new(ScriptedLlm::new(["answer\nSOURCES: http://0.test"]));
        let qa = pipeline(index.clone(), llm, 4);

        let (result, _) = qa
            .answer("q", None, ChatModel::Gpt4, IndexSelector::Ey)
            .await
            .unwrap();

        assert_eq!(index.queries(), vec![4]);
        assert_eq!(result.source_documents, docs[..4].to_vec());
    }

    #[tokio::test]
    async fn test_empty_retrieval() {
        let index = Arc::new(FakeIndex::new(Vec::new()));
        let llm = Arc::new(ScriptedLlm::new(["I don't know."]));
        let qa = pipeline(index, llm, 4);

        let (result, _) = qa
            .answer("q", None, ChatModel::Gpt35Turbo, IndexSelector::Ey)
            .await
            .unwrap();

        assert_eq!(result.sources, "");
        assert_eq!(format_qa(&result).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_index_error_propagates() {
        let llm = Arc::new(ScriptedLlm::new(["unused"]));
        let qa = pipeline(Arc::new(FakeIndex::failing()), llm.clone(), 4);

        let err = qa
            .answer("q", None, ChatModel::Gpt35Turbo, IndexSelector::Ey)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::VectorDb(_)));
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_index() {
        let llm = Arc::new(ScriptedLlm::new(["unused"]));
        let qa = pipeline(Arc::new(FakeIndex::new(france())), llm, 4);

        let err = qa
            .answer("q", None, ChatModel::Gpt35Turbo, IndexSelector::Board)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_embedding_error_propagates() {
        let index = Arc::new(FakeIndex::new(france()));
        let llm = Arc::new(ScriptedLlm::new(["unused"]));
        let qa = QaPipeline::new(Arc::new(FailingEmbedder), llm.clone()).with_index(
            IndexSelector::Board,
            index.clone(),
            4,
        );

        let err = qa
            .answer("q", None, ChatModel::Gpt35Turbo, IndexSelector::Board)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Embedding(_)));
        assert!(index.queries().is_empty());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let index = Arc::new(FakeIndex::new(france()));
        let llm = Arc::new(ScriptedLlm::default());
        let qa = pipeline(index.clone(), llm.clone(), 4);

        let err = qa
            .answer("q", Some(0.7), ChatModel::Gpt4, IndexSelector::Ey)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(index.queries(), vec![4]);
        assert_eq!(llm.requests().len(), 1);
    }
}
