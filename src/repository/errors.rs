use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint (slug, email, review per user) was violated.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A stored value could not be turned into a domain value.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<DieselError> for RepositoryError {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
