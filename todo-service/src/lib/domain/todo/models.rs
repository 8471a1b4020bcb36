use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::todo::errors::TodoIdError;
use crate::domain::todo::errors::TodoTitleError;
use crate::domain::user::models::UserId;

/// Todo item owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: TodoTitle,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Todo data to persist; id and timestamps are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: TodoTitle,
    pub description: String,
}

/// Todo unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(pub i64);

impl TodoId {
    /// Parse a todo ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, TodoIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(TodoId(id)),
            _ => Err(TodoIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Todo title value object: non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    const MAX_LENGTH: usize = 255;

    pub fn new(title: String) -> Result<Self, TodoTitleError> {
        let length = title.chars().count();
        if length == 0 {
            Err(TodoTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a todo for the authenticated user.
#[derive(Debug)]
pub struct CreateTodoCommand {
    pub title: TodoTitle,
    pub description: String,
}

/// Command to replace the mutable fields of a todo.
#[derive(Debug)]
pub struct UpdateTodoCommand {
    pub title: TodoTitle,
    pub description: String,
    pub completed: bool,
}
