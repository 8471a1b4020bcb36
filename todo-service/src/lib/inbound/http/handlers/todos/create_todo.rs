use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::TodoResponseData;
use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::TodoTitle;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<ApiSuccess<TodoResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .todo_service
        .create_todo(auth_user.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::CREATED, todo.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl CreateTodoRequest {
    fn try_into_command(self) -> Result<CreateTodoCommand, TodoError> {
        Ok(CreateTodoCommand {
            title: TodoTitle::new(self.title)?,
            description: self.description,
        })
    }
}
