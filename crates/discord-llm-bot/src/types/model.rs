//! Model identifiers, model profiles and index selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported chat models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChatModel {
    /// gpt-3.5-turbo
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    /// gpt-4
    #[serde(rename = "gpt-4")]
    Gpt4,
}

impl ChatModel {
    /// All supported models, in the order they are offered as choices
    pub const ALL: [ChatModel; 2] = [ChatModel::Gpt35Turbo, ChatModel::Gpt4];

    /// Model identifier sent to the API
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Gpt4 => "gpt-4",
        }
    }

    /// Short name shown in command choices
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-3.5",
            Self::Gpt4 => "gpt-4",
        }
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChatModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gpt-3.5-turbo" | "gpt-3.5" => Ok(Self::Gpt35Turbo),
            "gpt-4" => Ok(Self::Gpt4),
            other => Err(Error::invalid_option(
                "model",
                format!(
                    "'{}' is not one of {}",
                    other,
                    Self::ALL.map(|m| m.id()).join(", ")
                ),
            )),
        }
    }
}

/// Tokenizer and input budget associated with a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Tokenizer name (e.g. "cl100k_base")
    pub tokenizer: String,
    /// Maximum number of input tokens kept from fetched text
    pub max_input_tokens: usize,
}

impl ModelProfile {
    /// Create a new profile
    pub fn new(tokenizer: impl Into<String>, max_input_tokens: usize) -> Self {
        Self {
            tokenizer: tokenizer.into(),
            max_input_tokens,
        }
    }
}

/// Which of the two vector indexes a question is asked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexSelector {
    /// eugeneyan.com writing
    Ey,
    /// Board of advisors
    Board,
}

impl IndexSelector {
    /// Label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ey => "ey",
            Self::Board => "board",
        }
    }
}
