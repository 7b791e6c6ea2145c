//! Command endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::commands::{CollectingResponder, CommandInfo, CommandOptions};
use crate::error::Result;
use crate::server::state::AppState;

/// Messages produced by one command run
#[derive(Debug, Serialize)]
pub struct CommandReply {
    /// Whether the command deferred before answering
    pub deferred: bool,
    /// Messages in send order
    pub messages: Vec<String>,
}

/// GET /api/commands - List registered commands
pub async fn list_commands(State(state): State<AppState>) -> Json<Vec<CommandInfo>> {
    Json(state.router().commands())
}

/// POST /api/commands/:name - Run a command
pub async fn run_command(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(options): Json<CommandOptions>,
) -> Result<Json<CommandReply>> {
    let responder = CollectingResponder::new();
    state.router().dispatch(&name, options, &responder).await?;

    Ok(Json(CommandReply {
        deferred: responder.deferred(),
        messages: responder.messages(),
    }))
}
