//! Chat bot webhook

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::infrastructure::chat_commands::{run_chat_command, ChatCommand, ChatReply};
use crate::infrastructure::state::AppState;

/// Run one chat command; failures come back as a reply with `ok: false`
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<ChatCommand>,
) -> Json<ChatReply> {
    tracing::debug!(command = %command.name, invoker = %command.invoker_id, "Chat command received");
    Json(run_chat_command(&command, &state.group_service).await)
}
