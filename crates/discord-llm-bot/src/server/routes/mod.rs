//! API routes for the bot server

pub mod commands;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/commands", get(commands::list_commands))
        .route("/commands/:name", post(commands::run_command))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "discord-llm-bot",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat bot commands backed by LLM pipelines",
        "endpoints": {
            "GET /api/commands": "List registered commands",
            "POST /api/commands/:name": "Run a command and collect its messages"
        }
    }))
}
