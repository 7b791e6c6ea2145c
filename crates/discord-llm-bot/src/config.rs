//! Configuration for the bot

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{ChatModel, IndexSelector, ModelProfile};

/// Main bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// HTTP command surface
    pub server: ServerConfig,
    /// Chat platform limits and naming
    pub discord: DiscordConfig,
    /// Language model API
    pub llm: LlmConfig,
    /// Embedding model
    pub embeddings: EmbeddingConfig,
    /// Model profiles keyed by model
    pub models: ModelsConfig,
    /// Tokenizer name -> tokenizer.json path
    pub tokenizers: BTreeMap<String, PathBuf>,
    /// Token chunking
    pub chunking: ChunkingConfig,
    /// Vector indexes
    pub indexes: IndexesConfig,
    /// Web search agent
    pub search: SearchConfig,
    /// Books database
    pub sql: SqlConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        let mut tokenizers = BTreeMap::new();
        tokenizers.insert(
            "cl100k_base".to_string(),
            PathBuf::from("data/cl100k_base.json"),
        );

        Self {
            server: ServerConfig::default(),
            discord: DiscordConfig::default(),
            llm: LlmConfig::default(),
            embeddings: EmbeddingConfig::default(),
            models: ModelsConfig::default(),
            tokenizers,
            chunking: ChunkingConfig::default(),
            indexes: IndexesConfig::default(),
            search: SearchConfig::default(),
            sql: SqlConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-specific settings ("dev" prefixes every command)
    pub fn for_environment(mut self, env: &str) -> Self {
        if env == "dev" {
            self.discord.command_prefix = "dev-".to_string();
        }
        self
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.discord.max_initial_message_length == 0 || self.discord.max_message_length == 0 {
            return Err(Error::Config("message lengths must be > 0".to_string()));
        }

        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".to_string()));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(
                "chunking.chunk_overlap must be smaller than chunking.chunk_size".to_string(),
            ));
        }

        for (selector, index) in [
            (IndexSelector::Ey, &self.indexes.ey),
            (IndexSelector::Board, &self.indexes.board),
        ] {
            if index.top_k == 0 {
                return Err(Error::Config(format!(
                    "indexes.{}.top_k must be > 0",
                    selector.label()
                )));
            }
        }

        for model in ChatModel::ALL {
            let profile = self.models.profile(model);
            if !self.tokenizers.contains_key(&profile.tokenizer) {
                return Err(Error::Config(format!(
                    "model {} uses tokenizer '{}' but no path is configured under [tokenizers]",
                    model, profile.tokenizer
                )));
            }
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: false,
        }
    }
}

/// Chat platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Size limit of the first message sent for a command
    pub max_initial_message_length: usize,
    /// Size limit of each following message
    pub max_message_length: usize,
    /// Prepended to every command name
    pub command_prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            max_initial_message_length: 1900,
            max_message_length: 2000,
            command_prefix: String::new(),
        }
    }
}

/// Language model API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Model used when a command does not name one
    pub default_model: ChatModel,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 600,
            default_model: ChatModel::Gpt35Turbo,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model, fixed for the whole process
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
        }
    }
}

/// Model profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Profile for gpt-3.5-turbo
    #[serde(rename = "gpt-3.5-turbo")]
    pub gpt_35_turbo: ModelProfile,
    /// Profile for gpt-4
    #[serde(rename = "gpt-4")]
    pub gpt_4: ModelProfile,
}

impl ModelsConfig {
    /// Get the profile for a model
    pub fn profile(&self, model: ChatModel) -> &ModelProfile {
        match model {
            ChatModel::Gpt35Turbo => &self.gpt_35_turbo,
            ChatModel::Gpt4 => &self.gpt_4,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            gpt_35_turbo: ModelProfile::new("cl100k_base", 3800),
            gpt_4: ModelProfile::new("cl100k_base", 7000),
        }
    }
}

/// Token chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Tokens per chunk
    pub chunk_size: usize,
    /// Tokens shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 200,
        }
    }
}

/// Both vector indexes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexesConfig {
    /// Index behind `ask-ey`
    pub ey: IndexConfig,
    /// Index behind `board`
    pub board: IndexConfig,
}

impl IndexesConfig {
    /// Get the configuration of an index
    pub fn get(&self, selector: IndexSelector) -> &IndexConfig {
        match selector {
            IndexSelector::Ey => &self.ey,
            IndexSelector::Board => &self.board,
        }
    }
}

impl Default for IndexesConfig {
    fn default() -> Self {
        Self {
            ey: IndexConfig::new("ask-ey", "PINECONE_API_KEY_EY"),
            board: IndexConfig::new("board", "PINECONE_API_KEY_BOARD"),
        }
    }
}

/// One Pinecone index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name
    pub name: String,
    /// Pinecone environment (region)
    #[serde(default = "default_pinecone_environment")]
    pub environment: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Explicit index host; resolved through the controller when unset
    #[serde(default)]
    pub host: Option<String>,
    /// Number of documents retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Metadata key holding the document text
    #[serde(default = "default_text_key")]
    pub text_key: String,
}

impl IndexConfig {
    fn new(name: &str, api_key_env: &str) -> Self {
        Self {
            name: name.to_string(),
            environment: default_pinecone_environment(),
            api_key_env: api_key_env.to_string(),
            host: None,
            top_k: default_top_k(),
            text_key: default_text_key(),
        }
    }
}

fn default_pinecone_environment() -> String {
    "us-west4-gcp".to_string()
}

fn default_top_k() -> usize {
    4
}

fn default_text_key() -> String {
    "text".to_string()
}

/// Web search agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Environment variable holding the Google API key
    pub api_key_env: String,
    /// Environment variable holding the custom search engine id
    pub cse_id_env: String,
    /// Results requested per search
    pub num_results: u32,
    /// Maximum model calls per agent run
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_API_KEY".to_string(),
            cse_id_env: "GOOGLE_CSE_ID".to_string(),
            num_results: 10,
            max_iterations: 10,
        }
    }
}

/// Books database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Read-only SQLite file
    pub database_path: PathBuf,
    /// Row limit suggested to the SQL chain
    pub chain_top_k: usize,
    /// Row limit suggested to the SQL agent
    pub agent_top_k: usize,
    /// Maximum model calls per agent run
    pub max_iterations: usize,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/books.db"),
            chain_top_k: 5,
            agent_top_k: 10,
            max_iterations: 10,
        }
    }
}
