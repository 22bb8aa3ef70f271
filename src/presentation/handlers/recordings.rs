use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::domain::RecordingId;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::{
    AudioFileResponse, AudioUrlResponse, ConversationResponse, CreateConversationRequest,
    SearchParams, UpdateTranscriptRequest,
};

pub(super) fn parse_recording_id(raw: &str) -> Result<RecordingId, ApiError> {
    raw.parse::<RecordingId>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid conversation ID: {}", raw)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.0))]
pub async fn list_conversations_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let recordings = state.recording_service.list(user.0).await?;
    Ok(Json(
        recordings
            .into_iter()
            .map(ConversationResponse::from)
            .collect(),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = %user.0))]
pub async fn get_conversation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = parse_recording_id(&id)?;
    let recording = state.recording_service.get(user.0, id).await?;
    Ok(Json(recording.into()))
}

#[tracing::instrument(skip(state, body), fields(user_id = %user.0))]
pub async fn create_conversation_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let recording = state.recording_service.create(user.0, body.name).await?;
    Ok((StatusCode::CREATED, Json(recording.into())))
}

#[tracing::instrument(skip(state, body), fields(user_id = %user.0))]
pub async fn update_transcript_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTranscriptRequest>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = parse_recording_id(&id)?;
    let recording = state
        .recording_service
        .update_transcript(user.0, id, body.transcript)
        .await?;
    Ok(Json(recording.into()))
}

#[tracing::instrument(skip(state), fields(user_id = %user.0))]
pub async fn conversation_audio_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<AudioUrlResponse>, ApiError> {
    let id = parse_recording_id(&id)?;
    let audio_file = state
        .recording_service
        .audio_url(user.0, id)
        .await?
        .map(|(name, url)| AudioFileResponse {
            name,
            url: url.to_string(),
        });
    Ok(Json(AudioUrlResponse { audio_file }))
}

#[tracing::instrument(skip(state, params), fields(user_id = %user.0))]
pub async fn search_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let recordings = state.recording_service.search(user.0, &params.q).await?;
    Ok(Json(
        recordings
            .into_iter()
            .map(ConversationResponse::from)
            .collect(),
    ))
}
