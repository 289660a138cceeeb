use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use medcamp_core::models::test_entry::{TestEntry, TestReportStatus};
use medcamp_core::models::user::Principal;
use medcamp_lifecycle::engine::TestTable;
use medcamp_lifecycle::test_entry::{PatientForm, PaymentForm, TestEntryForm, VendorUpdate};
use medcamp_lifecycle::views::{Keyed, TestBoard, TestFilter};

use crate::error::ApiError;
use crate::state::{AppState, Provider, Store};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_status: TestReportStatus,
}

pub async fn list_tests<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(filter): Query<TestFilter>,
) -> Result<Json<TestTable>, ApiError> {
    Ok(Json(state.lifecycle.list_tests(&principal, &filter).await?))
}

pub async fn test_board<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<TestBoard>, ApiError> {
    Ok(Json(state.lifecycle.test_board(&principal).await?))
}

pub async fn search_tests<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Keyed<TestEntry>>>, ApiError> {
    Ok(Json(state.lifecycle.search_tests(&principal, &query.q).await?))
}

pub async fn test_by_code<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(code): Path<String>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    Ok(Json(state.lifecycle.test_by_code(&principal, &code).await?))
}

pub async fn create_test<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Json(form): Json<TestEntryForm>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    Ok(Json(state.lifecycle.create_test_entry(&principal, &form).await?))
}

pub async fn update_payment<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(payment): Json<PaymentForm>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    let entry = state
        .lifecycle
        .update_test_payment(&principal, &key, &payment)
        .await?;
    Ok(Json(entry))
}

pub async fn update_patient<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(patient): Json<PatientForm>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    let entry = state
        .lifecycle
        .update_test_patient(&principal, &key, &patient)
        .await?;
    Ok(Json(entry))
}

pub async fn update_vendor<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(update): Json<VendorUpdate>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    let entry = state
        .lifecycle
        .update_test_vendor(&principal, &key, &update)
        .await?;
    Ok(Json(entry))
}

pub async fn update_report<P: Provider, S: Store>(
    State(state): State<AppState<P, S>>,
    Extension(principal): Extension<Principal>,
    Path(key): Path<String>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Keyed<TestEntry>>, ApiError> {
    let entry = state
        .lifecycle
        .update_test_report(&principal, &key, request.report_status)
        .await?;
    Ok(Json(entry))
}
