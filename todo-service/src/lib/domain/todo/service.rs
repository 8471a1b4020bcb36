use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::TodoError;
use super::models::CreateTodoCommand;
use super::models::NewTodo;
use super::models::Todo;
use super::models::TodoId;
use super::models::UpdateTodoCommand;
use super::ports::TodoRepository;
use super::ports::TodoServicePort;
use crate::domain::user::models::UserId;

/// Concrete implementation of TodoServicePort.
///
/// Generic over repository for testability.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    todo_repository: Arc<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    pub fn new(todo_repository: Arc<TR>) -> Self {
        Self { todo_repository }
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn list_todos(&self, owner: UserId) -> Result<Vec<Todo>, TodoError> {
        self.todo_repository.list_by_owner(owner).await
    }

    async fn get_todo(&self, owner: UserId, id: TodoId) -> Result<Todo, TodoError> {
        self.todo_repository
            .find_by_id(owner, id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn create_todo(
        &self,
        owner: UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let todo = self
            .todo_repository
            .create(NewTodo {
                user_id: owner,
                title: command.title,
                description: command.description,
            })
            .await?;

        tracing::debug!(todo_id = %todo.id, user_id = %owner, "Todo created");

        Ok(todo)
    }

    async fn update_todo(
        &self,
        owner: UserId,
        id: TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let mut todo = self.get_todo(owner, id).await?;

        todo.title = command.title;
        todo.description = command.description;
        todo.completed = command.completed;
        todo.updated_at = Utc::now();

        self.todo_repository.update(todo).await
    }

    async fn delete_todo(&self, owner: UserId, id: TodoId) -> Result<(), TodoError> {
        self.todo_repository.delete(owner, id).await?;

        tracing::debug!(todo_id = %id, user_id = %owner, "Todo deleted");

        Ok(())
    }
}
