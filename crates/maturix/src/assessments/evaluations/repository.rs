use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{EvaluationId, EvaluationStatus, QuestionId, ResponseValue};
use super::scoring::Scorecard;

/// Repository record for one evaluation: answers, lifecycle, and the frozen
/// scorecard once the evaluation is finalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub company: String,
    pub status: EvaluationStatus,
    pub started_on: NaiveDate,
    pub completed_on: Option<NaiveDate>,
    pub responses: BTreeMap<QuestionId, ResponseValue>,
    pub scorecard: Option<Scorecard>,
}

impl EvaluationRecord {
    pub fn status_view(&self, question_total: usize) -> EvaluationStatusView {
        let scorecard = self.scorecard.as_ref();
        EvaluationStatusView {
            evaluation_id: self.id.clone(),
            company: self.company.clone(),
            status: self.status.label(),
            answered: self.responses.len(),
            total: question_total,
            global_score: scorecard.and_then(|card| card.global_score),
            global_percentage: scorecard.and_then(|card| card.global_percentage),
            global_level: scorecard.and_then(|card| card.global_level_label.clone()),
            started_on: self.started_on,
            completed_on: self.completed_on,
        }
    }
}

/// Sanitized representation of an evaluation's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStatusView {
    pub evaluation_id: EvaluationId,
    pub company: String,
    pub status: &'static str,
    pub answered: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_level: Option<String>,
    pub started_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn in_progress(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when an evaluation is finalized (e-mail digests,
/// CRM updates, and similar adapters).
pub trait CompletionPublisher: Send + Sync {
    fn publish(&self, notice: CompletionNotice) -> Result<(), NotifyError>;
}

/// Completion payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub template: String,
    pub evaluation_id: EvaluationId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
