use thiserror::Error;

use crate::auth::AuthError;
use crate::content::validate::ValidationError;
use crate::store::StoreError;

/// Outcome of a failed content or account operation.
///
/// Validation and authorization failures are raised before any store write,
/// so callers can rely on the store being unmodified when they see one.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Storage(StoreError::Serialization(err))
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
