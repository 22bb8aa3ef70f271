use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AudioStorageError, AuthError, RepositoryError};
use crate::application::services::{
    ChatError, CredentialsError, ReconciliationError, RecordingServiceError, UploadError,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-scoped failure, rendered as `{"error": "..."}` with the matching status code.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::Unauthorized(m)
            | ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::PayloadTooLarge(m)
            | ApiError::BadGateway(m)
            | ApiError::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(m) => ApiError::NotFound(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AudioStorageError> for ApiError {
    fn from(e: AudioStorageError) -> Self {
        match e {
            AudioStorageError::InvalidCredentials(_) => ApiError::BadRequest(e.to_string()),
            _ => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl From<RecordingServiceError> for ApiError {
    fn from(e: RecordingServiceError) -> Self {
        match e {
            RecordingServiceError::NotFound(_) | RecordingServiceError::CredentialsNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            RecordingServiceError::InvalidInput(m) => ApiError::BadRequest(m),
            RecordingServiceError::Storage(e) => e.into(),
            RecordingServiceError::Repository(e) => e.into(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::RecordingNotFound(_) => ApiError::NotFound(e.to_string()),
            ChatError::EmptyMessage => ApiError::BadRequest(e.to_string()),
            ChatError::Repository(e) => e.into(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::EmptyFile => ApiError::BadRequest(e.to_string()),
            UploadError::CredentialsNotFound(_) => ApiError::NotFound(e.to_string()),
            UploadError::Storage(e) => e.into(),
            UploadError::Repository(e) => e.into(),
        }
    }
}

impl From<CredentialsError> for ApiError {
    fn from(e: CredentialsError) -> Self {
        match e {
            CredentialsError::InvalidEncoding(_) | CredentialsError::MissingField(_) => {
                ApiError::BadRequest(e.to_string())
            }
            CredentialsError::Repository(e) => e.into(),
        }
    }
}

impl From<ReconciliationError> for ApiError {
    fn from(e: ReconciliationError) -> Self {
        match e {
            ReconciliationError::CredentialsNotFound(_) => ApiError::NotFound(e.to_string()),
            ReconciliationError::Storage(e) => e.into(),
            ReconciliationError::StorageList { .. } => ApiError::BadGateway(e.to_string()),
            ReconciliationError::Repository { source, .. } => source.into(),
        }
    }
}
