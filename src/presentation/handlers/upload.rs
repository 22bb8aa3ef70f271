use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::ConversationResponse;

const FILE_FIELD: &str = "file";

/// Accepts a multipart `file`, stores it in the caller's bucket and starts transcription.
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.0))]
pub async fn upload_audio_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<ConversationResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error("Unable to parse form", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "audio".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| form_error("Error retrieving file", e))?;

        tracing::debug!(filename = %filename, size = data.len(), "Received audio upload");

        let uploaded = state
            .upload_service
            .upload(user.0, &filename, data)
            .await?;
        return Ok(Json(uploaded.recording.into()));
    }

    Err(ApiError::BadRequest(format!(
        "multipart field '{}' is required",
        FILE_FIELD
    )))
}

fn form_error(context: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("{}: {}", context, e.body_text()))
    } else {
        ApiError::BadRequest(format!("{}: {}", context, e))
    }
}
