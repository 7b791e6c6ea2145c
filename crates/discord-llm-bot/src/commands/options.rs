//! Command options and their declarative constraints

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ChatModel;

use super::CommandKind;

/// Lowest accepted temperature
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest accepted temperature
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Options as received from the transport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOptions {
    /// URL, query or question, depending on the command
    #[serde(alias = "url", alias = "query", alias = "question")]
    pub text: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Model identifier
    pub model: Option<String>,
    /// Send source blocks after a QA answer
    pub show_source: bool,
    /// Display name or mention of the caller
    pub author: Option<String>,
}

/// Options after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Required text, empty for commands that take none
    pub text: String,
    pub temperature: Option<f32>,
    pub model: ChatModel,
    pub show_source: bool,
    pub author: Option<String>,
}

impl CommandOptions {
    /// Check the options against what `kind` declares
    pub fn resolve(self, kind: CommandKind, default_model: ChatModel) -> Result<ResolvedOptions> {
        let text = match kind.text_option() {
            Some(name) => {
                let text = self.text.map(|t| t.trim().to_string()).unwrap_or_default();
                if text.is_empty() {
                    return Err(Error::invalid_option(name, "is required"));
                }
                text
            }
            None => String::new(),
        };

        if let Some(t) = self.temperature {
            if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t) {
                return Err(Error::invalid_option(
                    "temperature",
                    format!("{} is outside [{}, {}]", t, MIN_TEMPERATURE, MAX_TEMPERATURE),
                ));
            }
        }

        let model = match self.model.as_deref() {
            Some(m) => m.parse()?,
            None => default_model,
        };

        Ok(ResolvedOptions {
            text,
            temperature: self.temperature,
            model,
            show_source: self.show_source,
            author: self.author,
        })
    }
}
