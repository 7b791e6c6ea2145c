//! Document type with source metadata for attribution

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata attached to a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// URL or identifier of the original source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Any other metadata stored alongside the vector
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A piece of text produced by retrieval or chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub content: String,
    /// Metadata (empty for chunks of a fetched page)
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document without metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata::default(),
        }
    }

    /// Create a document attributed to a source
    pub fn with_source(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: Some(source.into()),
                extra: HashMap::new(),
            },
        }
    }

    /// Source of the document, if recorded
    pub fn source(&self) -> Option<&str> {
        self.metadata.source.as_deref()
    }
}
