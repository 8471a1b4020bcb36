use thiserror::Error;

use crate::domain::todo::models::TodoId;

/// Error type for TodoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoIdError {
    #[error("invalid id: {0}")]
    InvalidFormat(String),
}

/// Error type for TodoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTitleError {
    #[error("title is required")]
    Empty,

    #[error("title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all todo operations
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid todo ID: {0}")]
    InvalidTodoId(#[from] TodoIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TodoTitleError),

    /// Also returned when the todo exists but belongs to another user.
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        TodoError::Unknown(err.to_string())
    }
}
