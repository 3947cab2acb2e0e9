use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use maturix::assessments::evaluations::{
    evaluation_router, parse_responses, CompletionPublisher, EvaluationRepository,
    EvaluationService, ImportError, InterpretationGrid, QuestionId, QuestionnaireBlueprint,
    ResponseValue, Scorecard, Scorer,
};
use maturix::error::AppError;

#[derive(Debug, Deserialize)]
pub(crate) struct MaturityReportRequest {
    #[serde(default)]
    pub(crate) company: Option<String>,
    #[serde(default)]
    pub(crate) responses: Option<BTreeMap<String, u8>>,
    #[serde(default)]
    pub(crate) responses_csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) computed_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MaturityReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) company: Option<String>,
    pub(crate) computed_on: NaiveDate,
    pub(crate) data_source: ReportDataSource,
    pub(crate) scorecard: Scorecard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportDataSource {
    Csv,
    Inline,
}

pub(crate) fn with_evaluation_routes<R, P>(service: Arc<EvaluationService<R, P>>) -> axum::Router
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    evaluation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/maturity/report",
            axum::routing::post(maturity_report_endpoint),
        )
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

/// One-shot scorecard computation against the standard catalog, without
/// touching the repository. Accepts either an inline answer map or a
/// `Question ID,Value` CSV export; the CSV wins when both are present.
pub(crate) async fn maturity_report_endpoint(
    Json(payload): Json<MaturityReportRequest>,
) -> Result<Json<MaturityReportResponse>, AppError> {
    let MaturityReportRequest {
        company,
        responses,
        responses_csv,
        computed_on,
    } = payload;

    let blueprint = QuestionnaireBlueprint::standard();
    let grid = InterpretationGrid::standard();

    let (answers, data_source) = if let Some(csv) = responses_csv {
        let reader = Cursor::new(csv.into_bytes());
        let parsed = parse_responses(reader, &blueprint)?;
        let answers: BTreeMap<QuestionId, ResponseValue> = parsed.into_iter().collect();
        (answers, ReportDataSource::Csv)
    } else {
        let mut answers = BTreeMap::new();
        for (raw_id, raw_value) in responses.unwrap_or_default() {
            let question_id = QuestionId(raw_id.clone());
            if blueprint.question(&question_id).is_none() {
                return Err(ImportError::UnknownQuestion(raw_id).into());
            }
            let value =
                ResponseValue::new(raw_value).map_err(|_| ImportError::InvalidValue {
                    question: raw_id,
                    value: raw_value.to_string(),
                })?;
            answers.insert(question_id, value);
        }
        (answers, ReportDataSource::Inline)
    };

    let computed_on = computed_on.unwrap_or_else(|| Local::now().date_naive());
    let scorecard = Scorer::new(&blueprint, &grid).compute(&answers);

    Ok(Json(MaturityReportResponse {
        company,
        computed_on,
        data_source,
        scorecard,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline_request(responses: BTreeMap<String, u8>) -> MaturityReportRequest {
        MaturityReportRequest {
            company: Some("Nexalis".to_string()),
            responses: Some(responses),
            responses_csv: None,
            computed_on: NaiveDate::from_ymd_opt(2026, 4, 1),
        }
    }

    #[tokio::test]
    async fn maturity_report_endpoint_scores_inline_answers() {
        let mut responses = BTreeMap::new();
        for question_id in QuestionnaireBlueprint::standard().question_ids() {
            responses.insert(question_id.0.clone(), 3);
        }

        let Json(body) = maturity_report_endpoint(Json(inline_request(responses)))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, ReportDataSource::Inline);
        assert_eq!(body.scorecard.global_score, Some(3.0));
        assert!(body.scorecard.is_complete());
    }

    #[tokio::test]
    async fn maturity_report_endpoint_prefers_csv_input() {
        let request = MaturityReportRequest {
            company: None,
            responses: None,
            responses_csv: Some(
                "Question ID,Value\nq-gouv-politique,4\nq-gouv-roles,2\n".to_string(),
            ),
            computed_on: NaiveDate::from_ymd_opt(2026, 4, 1),
        };

        let Json(body) = maturity_report_endpoint(Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, ReportDataSource::Csv);
        assert_eq!(body.scorecard.answered, 2);
        assert!(!body.scorecard.is_complete());
    }

    #[tokio::test]
    async fn maturity_report_endpoint_rejects_unknown_questions() {
        let mut responses = BTreeMap::new();
        responses.insert("q-fantome".to_string(), 3);

        let result = maturity_report_endpoint(Json(inline_request(responses))).await;

        assert!(matches!(result, Err(AppError::Import(_))));
    }

    #[tokio::test]
    async fn maturity_report_endpoint_rejects_out_of_scale_values() {
        let mut responses = BTreeMap::new();
        responses.insert("q-gouv-politique".to_string(), 7);

        let result = maturity_report_endpoint(Json(inline_request(responses))).await;

        assert!(matches!(
            result,
            Err(AppError::Import(ImportError::InvalidValue { .. }))
        ));
    }

    #[tokio::test]
    async fn maturity_report_endpoint_handles_an_empty_payload() {
        let request = MaturityReportRequest {
            company: None,
            responses: None,
            responses_csv: None,
            computed_on: NaiveDate::from_ymd_opt(2026, 4, 1),
        };

        let Json(body) = maturity_report_endpoint(Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.scorecard.answered, 0);
        assert_eq!(body.scorecard.global_score, None);
    }
}
