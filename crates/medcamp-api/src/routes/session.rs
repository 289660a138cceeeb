use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use medcamp_auth::session::Session;

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub async fn sign_in<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Session>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest {
            message: "email and password are required".to_string(),
            field: None,
        });
    }

    let session = state.sessions.sign_in(&request.email, &request.password).await?;
    Ok(Json(session))
}
