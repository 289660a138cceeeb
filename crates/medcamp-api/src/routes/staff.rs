use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use medcamp_core::models::staff::{StaffMember, StaffRole};
use medcamp_core::models::user::Principal;

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StaffQuery {
    pub role: Option<StaffRole>,
    pub q: String,
}

pub async fn search_staff<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<StaffQuery>,
) -> Result<Json<Vec<StaffMember>>, ApiError> {
    let members = state
        .lifecycle
        .search_staff(&principal, query.role, &query.q)
        .await?;
    Ok(Json(members))
}
