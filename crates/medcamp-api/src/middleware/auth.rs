use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

/// Bearer token middleware.
///
/// Verifies the `Authorization: Bearer <token>` header and resolves it to a
/// [`medcamp_core::models::user::Principal`] through the user record. On
/// success the principal is inserted into request extensions for handlers.
pub async fn require_auth<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let principal = state.sessions.authenticate_token(&token).await?;
    tracing::debug!(uid = %principal.uid, role = %principal.role, "request authenticated");

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}
