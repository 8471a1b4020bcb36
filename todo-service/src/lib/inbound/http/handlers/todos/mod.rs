pub mod create_todo;
pub mod delete_todo;
pub mod get_todo;
pub mod list_todos;
pub mod update_todo;

use chrono::DateTime;
use chrono::Utc;
pub use create_todo::create_todo;
pub use delete_todo::delete_todo;
pub use get_todo::get_todo;
pub use list_todos::list_todos;
use serde::Serialize;
pub use update_todo::update_todo;

use crate::domain::todo::models::Todo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoResponseData {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoResponseData {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.0,
            title: todo.title.as_str().to_string(),
            description: todo.description.clone(),
            completed: todo.completed,
            user_id: todo.user_id.0,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}
