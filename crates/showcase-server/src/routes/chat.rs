//! Shared chat room

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use showcase_core::commands::{ChatMessage, ChatRepository};

use crate::error::{require_fields, ApiError};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = ChatRepository::new(&state.db)
        .list_recent(state.config.chat.history_limit)
        .await?;
    Ok(Json(messages))
}

pub async fn post(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    require_fields(&[&body.content], "No message")?;

    ChatRepository::new(&state.db)
        .post(user.id, &user.username, body.content.trim())
        .await?;

    Ok(Json(json!({ "success": true })))
}
