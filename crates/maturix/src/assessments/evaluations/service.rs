use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::blueprint::{BlueprintError, QuestionnaireBlueprint};
use super::domain::{EvaluationId, EvaluationStatus, QuestionId, ResponseValue};
use super::grid::{GridError, InterpretationGrid};
use super::repository::{
    CompletionNotice, CompletionPublisher, EvaluationRecord, EvaluationRepository,
    EvaluationStatusView, NotifyError, RepositoryError,
};
use super::scoring::{Scorecard, Scorer};

/// Service composing the catalog, the interpretation grid, the repository,
/// and the completion notifier.
pub struct EvaluationService<R, P> {
    blueprint: Arc<QuestionnaireBlueprint>,
    grid: Arc<InterpretationGrid>,
    repository: Arc<R>,
    notifier: Arc<P>,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

/// One inbound answer, as submitted over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub question_id: QuestionId,
    pub value: u8,
}

impl<R, P> EvaluationService<R, P>
where
    R: EvaluationRepository + 'static,
    P: CompletionPublisher + 'static,
{
    /// Build the service, rejecting incoherent catalogs and grids up front
    /// so every later computation can assume the invariants hold.
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<P>,
        blueprint: QuestionnaireBlueprint,
        grid: InterpretationGrid,
    ) -> Result<Self, CatalogError> {
        blueprint.validate()?;
        grid.validate()?;

        Ok(Self {
            blueprint: Arc::new(blueprint),
            grid: Arc::new(grid),
            repository,
            notifier,
        })
    }

    pub fn blueprint(&self) -> &QuestionnaireBlueprint {
        &self.blueprint
    }

    pub fn status_view(&self, record: &EvaluationRecord) -> EvaluationStatusView {
        record.status_view(self.blueprint.question_count())
    }

    /// Open a new evaluation for a company.
    pub fn open(
        &self,
        company: &str,
        started_on: NaiveDate,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(WorkflowViolation::MissingCompany.into());
        }

        let record = EvaluationRecord {
            id: next_evaluation_id(),
            company: company.to_string(),
            status: EvaluationStatus::EnCours,
            started_on,
            completed_on: None,
            responses: BTreeMap::new(),
            scorecard: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Record a batch of answers on an in-progress evaluation.
    ///
    /// The batch is validated wholesale before anything is written: one
    /// unknown question or out-of-scale value rejects the entire request.
    /// Re-answering a question overwrites the previous value.
    pub fn record_responses(
        &self,
        id: &EvaluationId,
        entries: &[ResponseEntry],
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status == EvaluationStatus::Termine {
            return Err(WorkflowViolation::AlreadyFinalized(record.id.0).into());
        }

        let mut validated = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.blueprint.question(&entry.question_id).is_none() {
                return Err(
                    WorkflowViolation::UnknownQuestion(entry.question_id.0.clone()).into(),
                );
            }
            let value = ResponseValue::new(entry.value).map_err(|_| {
                WorkflowViolation::InvalidValue {
                    question: entry.question_id.0.clone(),
                    value: entry.value,
                }
            })?;
            validated.push((entry.question_id.clone(), value));
        }

        for (question_id, value) in validated {
            record.responses.insert(question_id, value);
        }

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Finalize an evaluation: compute the scorecard, freeze it, and notify.
    pub fn finalize(
        &self,
        id: &EvaluationId,
        completed_on: NaiveDate,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status == EvaluationStatus::Termine {
            return Err(WorkflowViolation::AlreadyFinalized(record.id.0).into());
        }

        let scorecard = Scorer::new(&self.blueprint, &self.grid).compute(&record.responses);

        record.status = EvaluationStatus::Termine;
        record.completed_on = Some(completed_on);
        record.scorecard = Some(scorecard.clone());

        self.repository.update(record.clone())?;
        self.notifier.publish(completion_notice(&record, &scorecard))?;

        Ok(record)
    }

    /// Recompute the frozen scorecard of a finalized evaluation in place.
    pub fn recalculate(&self, id: &EvaluationId) -> Result<EvaluationRecord, EvaluationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != EvaluationStatus::Termine {
            return Err(WorkflowViolation::NotFinalized(record.id.0).into());
        }

        let scorecard = Scorer::new(&self.blueprint, &self.grid).compute(&record.responses);
        record.scorecard = Some(scorecard);

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Fetch an evaluation and current status for API responses.
    pub fn get(&self, id: &EvaluationId) -> Result<EvaluationRecord, EvaluationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Frozen scorecard of a finalized evaluation.
    pub fn scorecard(&self, id: &EvaluationId) -> Result<Scorecard, EvaluationServiceError> {
        let record = self.get(id)?;
        record
            .scorecard
            .ok_or_else(|| WorkflowViolation::NotFinalized(record.id.0).into())
    }
}

fn completion_notice(record: &EvaluationRecord, scorecard: &Scorecard) -> CompletionNotice {
    let mut details = BTreeMap::new();
    details.insert("company".to_string(), record.company.clone());
    if let Some(score) = scorecard.global_score {
        details.insert("global_score".to_string(), format!("{score:.2}"));
    }
    if let Some(label) = &scorecard.global_level_label {
        details.insert("global_level".to_string(), label.clone());
    }

    CompletionNotice {
        template: "evaluation_completed".to_string(),
        evaluation_id: record.id.clone(),
        details,
    }
}

/// Workflow rules enforced before anything reaches the scoring pipeline.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowViolation {
    #[error("company name must not be empty")]
    MissingCompany,
    #[error("unknown question id '{0}'")]
    UnknownQuestion(String),
    #[error("invalid response value {value} for question '{question}'")]
    InvalidValue { question: String, value: u8 },
    #[error("evaluation '{0}' is already finalized")]
    AlreadyFinalized(String),
    #[error("evaluation '{0}' is not finalized")]
    NotFinalized(String),
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Startup-time validation failures for the catalog or the grid.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Blueprint(#[from] BlueprintError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
