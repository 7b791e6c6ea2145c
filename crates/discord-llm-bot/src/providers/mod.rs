//! Provider abstractions for embeddings, chat models, vector indexes and web search
//!
//! Pipelines depend only on the traits; the concrete clients talk to
//! OpenAI, Pinecone and Google over HTTP.

pub mod embedding;
pub mod llm;
pub mod vector_store;
pub mod search;
pub mod openai;
pub mod pinecone;
pub mod google;

pub use embedding::EmbeddingProvider;
pub use llm::{ChatMessage, ChatRequest, LlmProvider, Role};
pub use vector_store::{IndexStats, VectorIndex};
pub use search::SearchProvider;
pub use openai::OpenAiClient;
pub use pinecone::PineconeIndex;
pub use google::GoogleSearch;
