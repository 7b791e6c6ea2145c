//! Core types shared by the pipelines

pub mod document;
pub mod model;
pub mod response;

pub use document::{Document, DocumentMetadata};
pub use model::{ChatModel, IndexSelector, ModelProfile};
pub use response::{AgentResponse, AgentStep, ChainResponse, RetrievalResult};
