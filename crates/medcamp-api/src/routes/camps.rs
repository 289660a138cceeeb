use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use medcamp_core::models::camp::{Camp, CampReportStatus};
use medcamp_core::models::user::Principal;
use medcamp_lifecycle::camp::{CampForm, CompletionForm};
use medcamp_lifecycle::engine::CampTable;
use medcamp_lifecycle::views::{BoardContext, CampBoard, CampFilter, Keyed};

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BoardQuery {
    pub context: BoardContext,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestQuery {
    pub q: String,
    pub exclude_completed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusRequest {
    pub report_status: CampReportStatus,
}

pub async fn list_camps<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(filter): Query<CampFilter>,
) -> Result<Json<CampTable>, ApiError> {
    Ok(Json(state.lifecycle.list_camps(&principal, &filter).await?))
}

pub async fn camp_board<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<CampBoard>, ApiError> {
    Ok(Json(state.lifecycle.camp_board(&principal, query.context).await?))
}

pub async fn suggest_camps<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<Vec<Keyed<Camp>>>, ApiError> {
    let camps = state
        .lifecycle
        .suggest_camps(&principal, &query.q, query.exclude_completed)
        .await?;
    Ok(Json(camps))
}

pub async fn camp_by_code<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(code): Path<String>,
) -> Result<Json<Keyed<Camp>>, ApiError> {
    Ok(Json(state.lifecycle.camp_by_code(&principal, &code).await?))
}

pub async fn schedule_camp<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Json(form): Json<CampForm>,
) -> Result<Json<Keyed<Camp>>, ApiError> {
    Ok(Json(state.lifecycle.schedule_camp(&principal, &form).await?))
}

pub async fn complete_camp<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(form): Json<CompletionForm>,
) -> Result<Json<Keyed<Camp>>, ApiError> {
    Ok(Json(state.lifecycle.complete_camp(&principal, &key, &form).await?))
}

pub async fn cancel_camp<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
) -> Result<Json<Keyed<Camp>>, ApiError> {
    Ok(Json(state.lifecycle.cancel_camp(&principal, &key).await?))
}

pub async fn set_report_status<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(request): Json<ReportStatusRequest>,
) -> Result<Json<Keyed<Camp>>, ApiError> {
    let camp = state
        .lifecycle
        .set_camp_report_status(&principal, &key, request.report_status)
        .await?;
    Ok(Json(camp))
}
