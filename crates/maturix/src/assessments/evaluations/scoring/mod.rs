mod aggregate;
mod level;

pub use aggregate::weighted_mean;
pub use level::{percentage, MaturityLevel};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::blueprint::QuestionnaireBlueprint;
use super::domain::{FunctionId, QuestionId, ResponseValue, ThemeId};
use super::grid::{Interpretation, InterpretationGrid};

/// Stateless computation of a scorecard from a catalog, a grid, and the
/// recorded answers. All aggregation policy lives here: a scope with no
/// answers scores `None` and is excluded from its parent mean.
pub struct Scorer<'a> {
    blueprint: &'a QuestionnaireBlueprint,
    grid: &'a InterpretationGrid,
}

impl<'a> Scorer<'a> {
    pub fn new(blueprint: &'a QuestionnaireBlueprint, grid: &'a InterpretationGrid) -> Self {
        Self { blueprint, grid }
    }

    pub fn compute(&self, answers: &BTreeMap<QuestionId, ResponseValue>) -> Scorecard {
        let mut functions = Vec::new();
        let mut function_pairs = Vec::new();
        let mut answered_total = 0;
        let mut question_total = 0;

        for function in self.blueprint.ordered_functions() {
            let mut themes = Vec::new();
            let mut theme_pairs = Vec::new();
            let mut function_answered = 0;
            let mut function_questions = 0;

            for theme in self.blueprint.themes_for_function(&function.id) {
                let theme_score = self.score_theme(&theme.id, &theme.name, answers);
                if let (Some(score), weight) = (theme_score.score, theme_score.answered_weight) {
                    theme_pairs.push((score, weight));
                }
                function_answered += theme_score.answered;
                function_questions += theme_score.total;
                themes.push(theme_score);
            }

            let score = weighted_mean(&theme_pairs);
            let answered_weight: f64 = theme_pairs.iter().map(|(_, weight)| weight).sum();
            if let Some(score) = score {
                function_pairs.push((score, answered_weight));
            }

            let interpretation = score
                .and_then(|score| self.grid.resolve(&function.id, score).ok())
                .map(|row| row.interpretation());

            answered_total += function_answered;
            question_total += function_questions;

            functions.push(FunctionScore {
                function: function.id.clone(),
                function_label: function.name.clone(),
                score,
                percentage: score.map(percentage),
                level: score.map(MaturityLevel::from_score),
                level_label: score.map(|score| MaturityLevel::from_score(score).label().to_string()),
                interpretation,
                themes,
                answered: function_answered,
                total: function_questions,
            });
        }

        let global_score = weighted_mean(&function_pairs);

        Scorecard {
            functions,
            global_score,
            global_percentage: global_score.map(percentage),
            global_level: global_score.map(MaturityLevel::from_score),
            global_level_label: global_score
                .map(|score| MaturityLevel::from_score(score).label().to_string()),
            answered: answered_total,
            total: question_total,
        }
    }

    fn score_theme(
        &self,
        theme: &ThemeId,
        theme_label: &str,
        answers: &BTreeMap<QuestionId, ResponseValue>,
    ) -> ThemeScore {
        let questions = self.blueprint.questions_for_theme(theme);
        let mut pairs = Vec::new();

        for question in &questions {
            if let Some(value) = answers.get(&question.id) {
                pairs.push((value.as_score(), question.weight));
            }
        }

        let score = weighted_mean(&pairs);
        let answered_weight = pairs.iter().map(|(_, weight)| weight).sum();

        ThemeScore {
            theme: theme.clone(),
            theme_label: theme_label.to_string(),
            score,
            percentage: score.map(percentage),
            level: score.map(MaturityLevel::from_score),
            level_label: score.map(|score| MaturityLevel::from_score(score).label().to_string()),
            answered: pairs.len(),
            total: questions.len(),
            answered_weight,
        }
    }
}

/// Weighted mean of one theme's answered questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeScore {
    pub theme: ThemeId,
    pub theme_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<MaturityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_label: Option<String>,
    pub answered: usize,
    pub total: usize,
    /// Weight the theme contributes to its function mean (sum of answered
    /// question weights).
    pub answered_weight: f64,
}

/// Weighted mean of one function's themes, with its grid interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionScore {
    pub function: FunctionId,
    pub function_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<MaturityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Interpretation>,
    pub themes: Vec<ThemeScore>,
    pub answered: usize,
    pub total: usize,
}

/// Frozen result of a maturity computation for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub functions: Vec<FunctionScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_level: Option<MaturityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_level_label: Option<String>,
    pub answered: usize,
    pub total: usize,
}

impl Scorecard {
    pub fn function(&self, id: &FunctionId) -> Option<&FunctionScore> {
        self.functions.iter().find(|entry| &entry.function == id)
    }

    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}
