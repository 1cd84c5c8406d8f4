use crate::db::repository::RepoError;
use thiserror::Error;

/// Coordinator errors
///
/// Missing orders and missing bills are deliberate no-ops (`Ok(None)`), not
/// errors; this enum covers genuine failures only.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for CoordinatorError {
    fn from(err: sqlx::Error) -> Self {
        CoordinatorError::Database(err.to_string())
    }
}

impl CoordinatorError {
    /// Stable error code for targeted failure replies
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::Repo(RepoError::NotFound(_)) => "NOT_FOUND",
            CoordinatorError::Repo(RepoError::Duplicate(_)) => "DUPLICATE",
            CoordinatorError::Repo(RepoError::Validation(_)) => "VALIDATION",
            CoordinatorError::Repo(RepoError::Database(_)) | CoordinatorError::Database(_) => {
                "DATABASE"
            }
            CoordinatorError::Internal(_) => "INTERNAL",
        }
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
