use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bodyplan::workflows::consultation::{
    consultation_router, Combination, ConsultationRepository, ConsultationService,
    ProgramCode, RealisticCombination, RuleStore, RuleTable,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleTableResponse {
    pub(crate) version: u32,
    pub(crate) default_program_code: ProgramCode,
    pub(crate) realistic: Vec<RealisticCombination>,
    pub(crate) impossible: Vec<Combination>,
}

pub(crate) fn with_consultation_routes<R, S>(
    service: Arc<ConsultationService<R, S>>,
) -> axum::Router
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    consultation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/rules/table", axum::routing::get(rule_table_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Canonical table as compiled into this build, independent of runtime overrides.
pub(crate) async fn rule_table_endpoint() -> Json<RuleTableResponse> {
    let table = RuleTable::canonical();
    Json(RuleTableResponse {
        version: table.version(),
        default_program_code: table.default_program_code(),
        realistic: table.list_realistic_combinations(),
        impossible: table.impossible_combinations().to_vec(),
    })
}
