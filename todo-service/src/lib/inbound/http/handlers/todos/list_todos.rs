use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::TodoResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<TodoResponseData>>, ApiError> {
    state
        .todo_service
        .list_todos(auth_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|todos| ApiSuccess::new(StatusCode::OK, todos.iter().map(Into::into).collect()))
}
