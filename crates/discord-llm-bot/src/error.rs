//! Error types for the bot

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bot errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorDb(String),

    /// Language model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Page fetch error
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Books database error
    #[error("Database error: {0}")]
    Database(String),

    /// Web search error
    #[error("Search error: {0}")]
    Search(String),

    /// Agent could not parse the model output
    #[error("Could not parse LLM output: `{0}`")]
    OutputParse(String),

    /// Required field missing from an upstream response
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Command option outside its declared constraints
    #[error("Invalid option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    /// Command not registered
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector index error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::VectorDb(_) => (StatusCode::BAD_GATEWAY, "vector_db_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Fetch { .. } => (StatusCode::BAD_GATEWAY, "fetch_error"),
            Error::Tokenizer(_) => (StatusCode::INTERNAL_SERVER_ERROR, "tokenizer_error"),
            Error::Database(_) => (StatusCode::UNPROCESSABLE_ENTITY, "database_error"),
            Error::Search(_) => (StatusCode::BAD_GATEWAY, "search_error"),
            Error::OutputParse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "output_parse_error"),
            Error::MissingField { .. } => (StatusCode::BAD_GATEWAY, "missing_field"),
            Error::InvalidOption { .. } => (StatusCode::BAD_REQUEST, "invalid_option"),
            Error::UnknownCommand(_) => (StatusCode::NOT_FOUND, "unknown_command"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
