use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::{AddMessageRequest, ConversationResponse};
use super::recordings::parse_recording_id;

/// Appends a chat message and returns the updated conversation. Any transcription it triggers
/// runs detached from the request.
#[tracing::instrument(skip(state, body), fields(user_id = %user.0))]
pub async fn add_message_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let id = parse_recording_id(&id)?;
    let added = state
        .chat_service
        .add_message(user.0, id, body.content)
        .await?;

    if added.transcription.is_some() {
        tracing::info!(recording_id = %id, "First message started transcription");
    }

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse::from(added.recording)),
    ))
}
