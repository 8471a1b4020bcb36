use axum::extract::State;
use axum::http::StatusCode;

use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::router::AppState;

/// Tokens are stateless, so logging out only tells the client to drop its token.
pub async fn logout(State(state): State<AppState>) -> ApiSuccess<MessageResponseData> {
    state.auth_service.logout().await;

    ApiSuccess::new(StatusCode::OK, MessageResponseData::new("logout ok"))
}
