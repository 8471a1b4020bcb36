use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::todo::errors::TodoError;
use crate::user::errors::UserError;

pub mod current_user;
pub mod health;
pub mod login;
pub mod logout;
pub mod register;
pub mod todos;

pub use current_user::current_user;
pub use health::health;
pub use login::login;
pub use logout::logout;
pub use register::register;
pub use todos::create_todo;
pub use todos::delete_todo;
pub use todos::get_todo;
pub use todos::list_todos;
pub use todos::update_todo;

/// Message returned for every rejected credential or token.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Message returned for every server-side failure; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }

    pub fn internal() -> Self {
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "Unhandled error");
        Self::internal()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("invalid body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorData { error: message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => {
                ApiError::BadRequest("email already exists".to_string())
            }
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("invalid credentials".to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound("user not found".to_string()),
            UserError::InvalidName(ref e) => ApiError::BadRequest(e.to_string()),
            UserError::InvalidEmail(ref e) => ApiError::BadRequest(e.to_string()),
            UserError::InvalidPassword(ref e) => ApiError::BadRequest(e.to_string()),
            UserError::InvalidUserId(ref e) => ApiError::BadRequest(e.to_string()),
            UserError::Credential(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "User operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(_) => ApiError::NotFound("not found".to_string()),
            TodoError::InvalidTodoId(ref e) => ApiError::BadRequest(e.to_string()),
            TodoError::InvalidTitle(ref e) => ApiError::BadRequest(e.to_string()),
            TodoError::DatabaseError(_) | TodoError::Unknown(_) => {
                tracing::error!(error = %err, "Todo operation failed");
                ApiError::internal()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub error: String,
}

/// Body for endpoints that only acknowledge an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}

impl MessageResponseData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
