//! Structured results returned by the pipelines

use serde::{Deserialize, Serialize};

use super::document::Document;

/// Result of a retrieval-augmented question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The question as asked
    pub question: String,
    /// Answer text written by the model
    pub answer: String,
    /// Model-written citation text. Advisory only; it is not reconciled
    /// against `source_documents` and may be empty.
    pub sources: String,
    /// Retrieved documents in rank order (most relevant first)
    pub source_documents: Vec<Document>,
}

/// One tool invocation made by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    /// Tool name chosen by the model
    pub tool: String,
    /// Input passed to the tool
    pub tool_input: String,
    /// Raw model text that led to this action
    pub log: String,
    /// Tool output fed back to the model
    pub observation: String,
}

/// Final result of an agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Original input
    pub input: String,
    /// Final answer (or the iteration-limit message)
    pub output: String,
    /// Steps taken, in order
    pub intermediate_steps: Vec<AgentStep>,
}

/// Result of a fixed-sequence chain (question -> SQL -> answer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    /// Original query
    pub query: String,
    /// Final answer
    pub result: String,
    /// Intermediate values (generated SQL, raw result)
    pub intermediate_steps: Vec<String>,
}
