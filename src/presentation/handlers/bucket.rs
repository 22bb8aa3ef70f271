use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::services::ReconciliationError;
use crate::presentation::error::ApiError;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::{BucketSyncFailedResponse, ConversationResponse, NewConversationsResponse};

/// Reconciles the caller's bucket with their recordings and returns the ones it created.
/// Transcriptions started by the scan keep running after the response is sent.
#[tracing::instrument(skip(state), fields(user_id = %user.0))]
pub async fn query_bucket_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Response, ApiError> {
    match state.reconciliation_service.reconcile(user.0).await {
        Ok(report) => {
            let new_conversations = report
                .created
                .into_iter()
                .map(ConversationResponse::from)
                .collect();
            Ok((
                StatusCode::OK,
                Json(NewConversationsResponse { new_conversations }),
            )
                .into_response())
        }
        Err(ReconciliationError::StorageList { source, created }) => {
            tracing::warn!(error = %source, created = created.len(), "Bucket sync incomplete");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(BucketSyncFailedResponse {
                    error: format!("bucket listing failed: {}", source),
                    new_conversations: created
                        .into_iter()
                        .map(ConversationResponse::from)
                        .collect(),
                }),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
