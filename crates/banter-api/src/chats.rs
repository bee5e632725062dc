use axum::{
    Extension, Json,
    extract::{Path, State},
};
use tracing::{debug, warn};

use banter_db::parse_sqlite_timestamp;
use banter_genai::GenerationRequest;
use banter_types::api::{ChatReply, ChatRequest, SuccessResponse};
use banter_types::models::ChatEntry;

use crate::auth::{AppState, optional, run_blocking};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;

/// POST /chat_api: Ask the user's model, store the exchange, return the reply.
/// Nothing is stored when generation fails.
pub async fn chat_api(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let message = optional(req.message).ok_or(ApiError::EmptyMessage)?;

    let user_id = current.user_id;
    let model = run_blocking(&state, move |db| {
        Ok(db.get_user_by_id(user_id)?.and_then(|u| u.model))
    })
    .await?;

    let reply = state
        .generator
        .generate(GenerationRequest::text(message.clone(), model))
        .await?;

    let stored_reply = reply.clone();
    let chat_id =
        run_blocking(&state, move |db| db.append_chat(user_id, &message, &stored_reply)).await?;
    debug!(user_id, chat_id, "Chat stored");

    Ok(Json(ChatReply { reply }))
}

/// GET /chats: The caller's history, oldest first.
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<ChatEntry>>, ApiError> {
    let user_id = current.user_id;
    let rows = run_blocking(&state, move |db| db.list_chats(user_id)).await?;

    let chats = rows
        .into_iter()
        .map(|row| ChatEntry {
            created_at: parse_sqlite_timestamp(&row.created_at).unwrap_or_else(|| {
                warn!("Corrupt created_at '{}' on chat {}", row.created_at, row.id);
                chrono::DateTime::default()
            }),
            id: row.id,
            message: row.message,
            reply: row.reply,
        })
        .collect();

    Ok(Json(chats))
}

/// DELETE /delete_chat/{chat_id}: Succeeds even when the chat is not the
/// caller's; only the caller's own rows can be removed.
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = current.user_id;
    let deleted = run_blocking(&state, move |db| db.delete_chat(user_id, chat_id)).await?;
    debug!(user_id, chat_id, deleted, "Chat delete");

    Ok(Json(SuccessResponse::ok()))
}
