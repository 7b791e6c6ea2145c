//! Token encoders and the model → tokenizer mapping

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::{BotConfig, ModelsConfig};
use crate::error::{Error, Result};
use crate::types::{ChatModel, ModelProfile};

/// Encodes text to token ids and back
pub trait TokenEncoder: Send + Sync {
    /// Encode text to token ids
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode token ids to text
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text)?.len())
    }
}

/// HuggingFace tokenizer loaded from a `tokenizer.json`
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            Error::Tokenizer(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Ok(Self { inner })
    }
}

impl TokenEncoder for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| Error::Tokenizer(format!("Encoding failed: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, false)
            .map_err(|e| Error::Tokenizer(format!("Decoding failed: {}", e)))
    }
}

/// Resolves a chat model to its profile and encoder
pub struct TokenizerRegistry {
    models: ModelsConfig,
    encoders: HashMap<String, Arc<dyn TokenEncoder>>,
}

impl TokenizerRegistry {
    /// Create an empty registry for the given profiles
    pub fn new(models: ModelsConfig) -> Self {
        Self {
            models,
            encoders: HashMap::new(),
        }
    }

    /// Load every tokenizer named in the configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let mut registry = Self::new(config.models.clone());
        for (name, path) in &config.tokenizers {
            tracing::info!("Loading tokenizer '{}' from {}", name, path.display());
            registry.register(name.clone(), Arc::new(HfTokenizer::from_file(path)?));
        }
        Ok(registry)
    }

    /// Register an encoder under a tokenizer name
    pub fn register(&mut self, name: impl Into<String>, encoder: Arc<dyn TokenEncoder>) {
        self.encoders.insert(name.into(), encoder);
    }

    /// Profile of a model
    pub fn profile(&self, model: ChatModel) -> &ModelProfile {
        self.models.profile(model)
    }

    /// Encoder used by a model
    pub fn encoder(&self, model: ChatModel) -> Result<Arc<dyn TokenEncoder>> {
        let profile = self.profile(model);
        self.encoders
            .get(&profile.tokenizer)
            .cloned()
            .ok_or_else(|| {
                Error::Tokenizer(format!(
                    "No tokenizer '{}' loaded for model {}",
                    profile.tokenizer, model
                ))
            })
    }
}
