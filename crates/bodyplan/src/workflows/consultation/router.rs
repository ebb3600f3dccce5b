use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{ConsultationId, ConsultationRequest};
use super::repository::{ConsultationRepository, ConsultationUpdate, RepositoryError};
use super::service::{ConsultationService, ConsultationServiceError};
use super::store::RuleStore;

/// Router builder exposing consultation intake, lookup, and rule coverage endpoints.
pub fn consultation_router<R, S>(service: Arc<ConsultationService<R, S>>) -> Router
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/consultations",
            post(submit_handler::<R, S>).get(list_handler::<R, S>),
        )
        .route(
            "/api/v1/consultations/preview",
            post(preview_handler::<R, S>),
        )
        .route(
            "/api/v1/consultations/:consultation_id",
            get(status_handler::<R, S>).patch(update_handler::<R, S>),
        )
        .route("/api/v1/rules/missing", get(missing_handler::<R, S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
    payload: Result<axum::Json<ConsultationRequest>, JsonRejection>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.submit(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
    payload: Result<axum::Json<ConsultationRequest>, JsonRejection>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.preview(&request) {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    match service.list() {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
    Path(consultation_id): Path<String>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    match service.get(&ConsultationId(consultation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
    Path(consultation_id): Path<String>,
    payload: Result<axum::Json<ConsultationUpdate>, JsonRejection>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    let axum::Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.update(&ConsultationId(consultation_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn missing_handler<R, S>(
    State(service): State<Arc<ConsultationService<R, S>>>,
) -> Response
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    match service.missing_combinations() {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ConsultationServiceError) -> Response {
    let (status, kind) = match &error {
        ConsultationServiceError::Intake(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        ConsultationServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        ConsultationServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "conflict")
        }
        ConsultationServiceError::Resolution(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "configuration")
        }
        ConsultationServiceError::Repository(RepositoryError::Unavailable(_))
        | ConsultationServiceError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };

    let payload = json!({
        "error": error.to_string(),
        "error_kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}

/// Malformed or unexpected bodies keep the same error shape as service failures.
fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "error_kind": "validation",
    });
    (rejection.status(), axum::Json(payload)).into_response()
}
