//! Maturity evaluation intake, scoring, and interpretation.

pub mod blueprint;
pub mod domain;
pub mod grid;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use blueprint::{BlueprintError, QuestionnaireBlueprint};
pub use domain::{
    EvaluationId, EvaluationStatus, FunctionId, MaturityFunction, Question, QuestionId,
    ResponseValue, ResponseValueError, Theme, ThemeId,
};
pub use grid::{GridError, GridRow, Interpretation, InterpretationGrid};
pub use import::{parse_responses, ImportError};
pub use repository::{
    CompletionNotice, CompletionPublisher, EvaluationRecord, EvaluationRepository,
    EvaluationStatusView, NotifyError, RepositoryError,
};
pub use router::evaluation_router;
pub use scoring::{
    percentage, weighted_mean, FunctionScore, MaturityLevel, Scorecard, Scorer, ThemeScore,
};
pub use service::{
    CatalogError, EvaluationService, EvaluationServiceError, ResponseEntry, WorkflowViolation,
};
