use async_trait::async_trait;

use super::errors::TodoError;
use super::models::CreateTodoCommand;
use super::models::NewTodo;
use super::models::Todo;
use super::models::TodoId;
use super::models::UpdateTodoCommand;
use crate::domain::user::models::UserId;

/// Port for todo domain service operations.
///
/// Every operation is scoped to `owner`; todos of other users behave as
/// if they did not exist.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    /// List the owner's todos, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_todos(&self, owner: UserId) -> Result<Vec<Todo>, TodoError>;

    /// Retrieve one of the owner's todos.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn get_todo(&self, owner: UserId, id: TodoId) -> Result<Todo, TodoError>;

    /// Create a todo owned by `owner`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_todo(
        &self,
        owner: UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Replace title, description and completion state of a todo.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_todo(
        &self,
        owner: UserId,
        id: TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Delete one of the owner's todos.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<(), TodoError>;
}

/// Persistence operations for todo items.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Retrieve all todos of an owner ordered by id, descending.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoError>;

    /// Retrieve a todo only if it belongs to `owner`.
    ///
    /// # Returns
    /// Optional todo (None if missing or owned by someone else)
    async fn find_by_id(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, TodoError>;

    /// Persist a new todo and return it with its assigned id.
    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError>;

    /// Store the mutable fields of an existing todo.
    ///
    /// # Errors
    /// * `NotFound` - No todo with this id for this owner
    async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Remove a todo owned by `owner`.
    ///
    /// # Errors
    /// * `NotFound` - No todo with this id for this owner
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<(), TodoError>;
}
