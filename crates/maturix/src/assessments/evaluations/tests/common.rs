use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;

use crate::assessments::evaluations::blueprint::QuestionnaireBlueprint;
use crate::assessments::evaluations::domain::{EvaluationId, QuestionId, ResponseValue};
use crate::assessments::evaluations::grid::InterpretationGrid;
use crate::assessments::evaluations::repository::{
    CompletionNotice, CompletionPublisher, EvaluationRecord, EvaluationRepository, NotifyError,
    RepositoryError,
};
use crate::assessments::evaluations::service::{EvaluationService, ResponseEntry};

pub(super) fn blueprint() -> QuestionnaireBlueprint {
    QuestionnaireBlueprint::standard()
}

pub(super) fn grid() -> InterpretationGrid {
    InterpretationGrid::standard()
}

pub(super) fn started_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

pub(super) fn completed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).expect("valid date")
}

/// Deterministic full answer sheet cycling mid-to-high values.
pub(super) fn complete_answers() -> Vec<ResponseEntry> {
    let pattern = [4, 3, 5, 2];
    blueprint()
        .question_ids()
        .enumerate()
        .map(|(index, question_id)| ResponseEntry {
            question_id: question_id.clone(),
            value: pattern[index % pattern.len()],
        })
        .collect()
}

/// Answers for every cybersecurity question, leaving DevSecOps untouched.
pub(super) fn cyber_only_answers() -> Vec<ResponseEntry> {
    let blueprint = blueprint();
    blueprint
        .question_ids()
        .filter(|question_id| {
            blueprint
                .question(question_id)
                .map(|question| question.theme.0.starts_with("cyber-"))
                .unwrap_or(false)
        })
        .map(|question_id| ResponseEntry {
            question_id: question_id.clone(),
            value: 4,
        })
        .collect()
}

pub(super) fn answer_map(entries: &[ResponseEntry]) -> BTreeMap<QuestionId, ResponseValue> {
    entries
        .iter()
        .map(|entry| {
            (
                entry.question_id.clone(),
                ResponseValue::new(entry.value).expect("test values are on scale"),
            )
        })
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl EvaluationRepository for MemoryRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn in_progress(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.status == crate::assessments::evaluations::domain::EvaluationStatus::EnCours
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<CompletionNotice>>>,
}

impl CompletionPublisher for MemoryNotifier {
    fn publish(&self, notice: CompletionNotice) -> Result<(), NotifyError> {
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<CompletionNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Repository that refuses every insert with a conflict.
pub(super) struct ConflictRepository;

impl EvaluationRepository for ConflictRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Ok(None)
    }

    fn in_progress(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Repository simulating a storage outage.
pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn update(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn in_progress(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    EvaluationService<MemoryRepository, MemoryNotifier>,
    MemoryRepository,
    MemoryNotifier,
) {
    let repository = MemoryRepository::default();
    let notifier = MemoryNotifier::default();
    let service = EvaluationService::new(
        Arc::new(repository.clone()),
        Arc::new(notifier.clone()),
        blueprint(),
        grid(),
    )
    .expect("standard catalog and grid are valid");
    (service, repository, notifier)
}

pub(super) async fn read_json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
