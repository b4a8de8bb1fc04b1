use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }

    /// Converts a failed write into a `ConstraintViolation` when Postgres rejected it
    /// for a unique or foreign key constraint.
    pub fn from_write(error: sqlx::Error, conflict: &str) -> Self {
        let error = StorageError::from(error);
        if error.is_unique_violation() || error.is_foreign_key_violation() {
            return StorageError::ConstraintViolation(conflict.to_string());
        }
        error
    }
}

/// Errors raised by the scoring, ranking and lifecycle services.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid rule parameters: {0}")]
    InvalidRuleParameters(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StorageError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

impl From<StorageError> for EngineError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => EngineError::NotFound("Resource not found".to_string()),
            other => EngineError::Store(other),
        }
    }
}

impl From<UnknownVariant> for EngineError {
    fn from(error: UnknownVariant) -> Self {
        EngineError::Validation(error.to_string())
    }
}

/// A text column or request field did not match any variant of a closed enum.
#[derive(Debug, Clone, Error)]
#[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Maps a `StorageError::NotFound` to an `EngineError::NotFound` naming the missing entity.
pub trait NotFoundContext<T> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> EngineResult<T>;
}

impl<T> NotFoundContext<T> for Result<T> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> EngineResult<T> {
        self.map_err(|e| match e {
            StorageError::NotFound => EngineError::NotFound(what()),
            other => EngineError::Store(other),
        })
    }
}
