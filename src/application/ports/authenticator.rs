use crate::domain::UserId;

/// Turns the `Authorization` header of an inbound request into a user id.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid user id in token")]
    InvalidSubject,
}
