//! medcamp-api
//!
//! The HTTP surface of the lifecycle engine, served from AWS Lambda through
//! `lambda_http`. Everything except `/health` and `POST /session` needs a
//! bearer token.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::{AppState, Provider, Store};

/// Build the application router over the given state.
pub fn router<P: Provider, S: Store>(state: AppState<P, S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // Clinics and staff
        .route("/clinics/{code}", get(routes::clinics::resolve_clinic::<P, S>))
        .route("/staff", get(routes::staff::search_staff::<P, S>))
        // Camps
        .route("/camps", get(routes::camps::list_camps::<P, S>))
        .route("/camps", post(routes::camps::schedule_camp::<P, S>))
        .route("/camps/board", get(routes::camps::camp_board::<P, S>))
        .route("/camps/suggest", get(routes::camps::suggest_camps::<P, S>))
        .route("/camps/by-code/{code}", get(routes::camps::camp_by_code::<P, S>))
        .route("/camps/{key}/complete", post(routes::camps::complete_camp::<P, S>))
        .route("/camps/{key}/cancel", post(routes::camps::cancel_camp::<P, S>))
        .route(
            "/camps/{key}/report-status",
            post(routes::camps::set_report_status::<P, S>),
        )
        // Individual tests
        .route("/tests", get(routes::tests::list_tests::<P, S>))
        .route("/tests", post(routes::tests::create_test::<P, S>))
        .route("/tests/board", get(routes::tests::test_board::<P, S>))
        .route("/tests/search", get(routes::tests::search_tests::<P, S>))
        .route("/tests/by-code/{code}", get(routes::tests::test_by_code::<P, S>))
        .route("/tests/{key}/payment", put(routes::tests::update_payment::<P, S>))
        .route("/tests/{key}/patient", put(routes::tests::update_patient::<P, S>))
        .route("/tests/{key}/vendor", post(routes::tests::update_vendor::<P, S>))
        .route("/tests/{key}/report", post(routes::tests::update_report::<P, S>))
        // Dashboards
        .route("/dashboard/camps", get(routes::dashboard::camp_dashboard::<P, S>))
        .route("/dashboard/tests", get(routes::dashboard::test_dashboard::<P, S>))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth::<P, S>,
        ));

    Router::new()
        // No auth
        .route("/health", get(routes::health::health_check))
        .route("/session", post(routes::session::sign_in::<P, S>))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
