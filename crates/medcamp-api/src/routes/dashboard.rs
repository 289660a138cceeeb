use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use medcamp_core::models::user::Principal;
use medcamp_lifecycle::analytics::{CampDashboardFilter, TestMetrics};
use medcamp_lifecycle::engine::CampDashboard;

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestDashboardQuery {
    pub test_name: Option<String>,
}

pub async fn camp_dashboard<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(filter): Query<CampDashboardFilter>,
) -> Result<Json<CampDashboard>, ApiError> {
    Ok(Json(state.lifecycle.camp_dashboard(&principal, &filter).await?))
}

pub async fn test_dashboard<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<TestDashboardQuery>,
) -> Result<Json<TestMetrics>, ApiError> {
    let metrics = state
        .lifecycle
        .test_dashboard(&principal, query.test_name.as_deref())
        .await?;
    Ok(Json(metrics))
}
