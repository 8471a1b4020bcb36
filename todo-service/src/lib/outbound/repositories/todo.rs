use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::NewTodo;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

/// PostgreSQL implementation of TodoRepository.
///
/// Every statement filters on `user_id`, so ownership is enforced in SQL.
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId(row.id),
            user_id: UserId(row.user_id),
            title: TodoTitle::new(row.title)?,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn find_by_id(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, TodoError> {
        sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, user_id, title, description, completed, created_at, updated_at
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?
        .map(Todo::try_from)
        .transpose()
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(todo.user_id.0)
        .bind(todo.title.as_str())
        .bind(&todo.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        row.try_into()
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $3, description = $4, completed = $5, updated_at = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.user_id.0)
        .bind(todo.title.as_str())
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(todo.id));
        }

        Ok(todo)
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<(), TodoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TodoError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }

        Ok(())
    }
}
