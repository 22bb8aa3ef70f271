use axum::Json;
use axum::extract::State;

use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::{MessageResponse, SaveCredentialsRequest};

#[tracing::instrument(skip(state, body), fields(user_id = %user.0))]
pub async fn save_credentials_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SaveCredentialsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .credentials_service
        .save(
            user.0,
            body.credentials,
            body.bucket_name,
            body.provider_api_key,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Storage credentials saved successfully".to_string(),
    }))
}
