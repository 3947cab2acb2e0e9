use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for top-level maturity functions (e.g. Cybersécurité).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub String);

/// Identifier wrapper for question themes within a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThemeId(pub String);

/// Identifier wrapper for catalog questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for opened evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level maturity domain assessed by the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityFunction {
    pub id: FunctionId,
    pub name: String,
    pub display_order: u16,
}

/// Grouping of questions within a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: ThemeId,
    pub function: FunctionId,
    pub name: String,
    pub display_order: u16,
}

/// A single catalog question. The weight (ponderation) drives every
/// aggregation above it and must be strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub theme: ThemeId,
    pub statement: String,
    pub weight: f64,
    pub display_order: u16,
}

/// Validated questionnaire answer, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ResponseValue(u8);

impl ResponseValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(raw: u8) -> Result<Self, ResponseValueError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ResponseValueError(raw))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn as_score(self) -> f64 {
        f64::from(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("response value must be between 1 and 5, got {0}")]
pub struct ResponseValueError(pub u8);

impl TryFrom<u8> for ResponseValue {
    type Error = ResponseValueError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ResponseValue> for u8 {
    fn from(value: ResponseValue) -> Self {
        value.0
    }
}

/// Lifecycle of an evaluation. Scores are computed on the transition to
/// `Termine` and stay frozen until an explicit recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    EnCours,
    Termine,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationStatus::EnCours => "en_cours",
            EvaluationStatus::Termine => "termine",
        }
    }
}
