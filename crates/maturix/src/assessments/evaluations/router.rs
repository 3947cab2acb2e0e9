use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::EvaluationId;
use super::repository::{CompletionPublisher, EvaluationRepository, RepositoryError};
use super::service::{
    EvaluationService, EvaluationServiceError, ResponseEntry, WorkflowViolation,
};

/// Router builder exposing HTTP endpoints for the evaluation workflow.
pub fn evaluation_router<R, P>(service: Arc<EvaluationService<R, P>>) -> Router
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(open_handler::<R, P>))
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(status_handler::<R, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/responses",
            post(record_handler::<R, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/finalize",
            post(finalize_handler::<R, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/recalculate",
            post(recalculate_handler::<R, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/scorecard",
            get(scorecard_handler::<R, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct OpenEvaluationRequest {
    pub company: String,
    #[serde(default)]
    pub started_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RecordResponsesRequest {
    pub responses: Vec<ResponseEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FinalizeRequest {
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
}

pub(crate) async fn open_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    axum::Json(request): axum::Json<OpenEvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let started_on = request
        .started_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.open(&request.company, started_on) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.get(&id) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<RecordResponsesRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.record_responses(&id, &request.responses) {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<FinalizeRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    let completed_on = request
        .completed_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.finalize(&id, completed_on) {
        Ok(record) => match record.scorecard {
            Some(scorecard) => (StatusCode::OK, axum::Json(scorecard)).into_response(),
            None => error_response(EvaluationServiceError::Repository(
                RepositoryError::Unavailable("finalized record lost its scorecard".to_string()),
            )),
        },
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.recalculate(&id) {
        Ok(record) => match record.scorecard {
            Some(scorecard) => (StatusCode::OK, axum::Json(scorecard)).into_response(),
            None => error_response(EvaluationServiceError::Repository(
                RepositoryError::Unavailable("recalculated record lost its scorecard".to_string()),
            )),
        },
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scorecard_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.scorecard(&id) {
        Ok(scorecard) => (StatusCode::OK, axum::Json(scorecard)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::Workflow(violation) => match violation {
            WorkflowViolation::MissingCompany
            | WorkflowViolation::UnknownQuestion(_)
            | WorkflowViolation::InvalidValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowViolation::AlreadyFinalized(_) | WorkflowViolation::NotFinalized(_) => {
                StatusCode::CONFLICT
            }
        },
        EvaluationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::Unavailable(_))
        | EvaluationServiceError::Notify(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
