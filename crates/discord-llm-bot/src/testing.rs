//! In-memory provider fakes shared by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::providers::{ChatRequest, EmbeddingProvider, IndexStats, LlmProvider, SearchProvider, VectorIndex};
use crate::types::Document;

/// Embeds every text as its length
pub struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 1.0])
    }

    fn model(&self) -> &str {
        "fake-embedding"
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Fails every embedding call
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("quota exceeded"))
    }

    fn model(&self) -> &str {
        "fake-embedding"
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Returns a fixed ranked list, or fails every query
pub struct FakeIndex {
    documents: Vec<Document>,
    fail: bool,
    queries: Mutex<Vec<usize>>,
}

impl FakeIndex {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            documents: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `top_k` of every query received
    pub fn queries(&self) -> Vec<usize> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<Document>> {
        self.queries.lock().push(top_k);
        if self.fail {
            return Err(Error::vector_db("connection refused"));
        }
        Ok(self.documents.iter().take(top_k).cloned().collect())
    }

    async fn describe(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            dimension: 2,
            total_vector_count: self.documents.len() as u64,
            index_fullness: 0.0,
        })
    }

    fn name(&self) -> &str {
        "fake-index"
    }
}

/// Replies with scripted completions in order and records every request
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| Error::llm("no scripted reply left"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Answers every search with the same text
pub struct FakeSearch(pub String);

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, _query: &str) -> Result<String> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fake-search"
    }
}
