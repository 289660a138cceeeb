use axum::extract::{Path, State};
use axum::{Extension, Json};

use medcamp_core::models::user::Principal;
use medcamp_lifecycle::clinic::ClinicPrefill;

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

pub async fn resolve_clinic<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(code): Path<String>,
) -> Result<Json<ClinicPrefill>, ApiError> {
    let prefill = state.lifecycle.resolve_clinic(&principal, &code).await?;
    Ok(Json(prefill))
}
