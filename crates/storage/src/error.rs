use std::time::Duration;

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

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_check_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23514")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_are_not_constraint_violations() {
        assert!(!StorageError::NotFound.is_unique_violation());
        assert!(!StorageError::Timeout(Duration::from_secs(5)).is_check_violation());
        assert!(!StorageError::Database(sqlx::Error::RowNotFound).is_unique_violation());
    }

    #[test]
    fn test_timeout_message_mentions_duration() {
        let err = StorageError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Store operation timed out after 1.5s");
    }

    #[test]
    fn test_invalid_message_names_field() {
        let err = StorageError::invalid("criterion2", "rating must be between 0 and 5");
        assert_eq!(
            err.to_string(),
            "Invalid criterion2: rating must be between 0 and 5"
        );
    }
}
