use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a verified token, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that verifies the bearer token and attaches the caller's identity.
///
/// Every rejection produces the same 401 body; the reason is only logged.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers()).map_err(|reason| {
        tracing::warn!(reason, "Rejected request without usable credentials");
        ApiError::unauthorized()
    })?;

    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(kind = token_error_kind(&e), error = %e, "Token verification failed");
        ApiError::unauthorized()
    })?;

    let user_id = claims.subject::<UserId>().map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        ApiError::unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("missing authorization header")?;

    let value = value
        .to_str()
        .map_err(|_| "authorization header is not valid text")?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or("authorization header is not a bearer credential")?;

    if token.is_empty() {
        return Err("empty bearer token");
    }

    Ok(token)
}

fn token_error_kind(err: &JwtError) -> &'static str {
    match err {
        JwtError::Malformed(_) => "malformed",
        JwtError::SignatureInvalid => "signature_invalid",
        JwtError::Expired => "expired",
        JwtError::EncodingFailed(_) => "encoding_failed",
    }
}
