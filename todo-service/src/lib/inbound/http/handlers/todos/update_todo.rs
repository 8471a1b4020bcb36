use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::TodoResponseData;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for replacing a todo (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl UpdateTodoRequest {
    fn try_into_command(self) -> Result<UpdateTodoCommand, TodoError> {
        Ok(UpdateTodoCommand {
            title: TodoTitle::new(self.title)?,
            description: self.description,
            completed: self.completed,
        })
    }
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    let todo_id = TodoId::from_string(&id).map_err(TodoError::from)?;
    let Json(body) = body?;
    let command = body.try_into_command()?;

    state
        .todo_service
        .update_todo(auth_user.user_id, todo_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, todo.into()))
}
