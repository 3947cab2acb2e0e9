use std::collections::BTreeMap;

use super::common::*;
use crate::assessments::evaluations::domain::{FunctionId, QuestionId, ResponseValue};
use crate::assessments::evaluations::scoring::{MaturityLevel, Scorer};

#[test]
fn complete_answers_produce_a_full_scorecard() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    let scorecard = scorer.compute(&answer_map(&complete_answers()));

    assert!(scorecard.is_complete());
    assert_eq!(scorecard.total, blueprint.question_count());
    let global = scorecard.global_score.expect("all questions answered");
    assert!((1.0..=5.0).contains(&global));
    assert!(scorecard.global_level.is_some());
    assert!(scorecard.global_percentage.is_some());

    for function in &scorecard.functions {
        let score = function.score.expect("every function fully answered");
        assert!((1.0..=5.0).contains(&score));
        let interpretation = function
            .interpretation
            .as_ref()
            .expect("standard grid covers every score");
        assert!(!interpretation.recommendation.is_empty());
        assert_eq!(function.answered, function.total);
    }
}

#[test]
fn empty_answer_sheet_scores_none_everywhere() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    let scorecard = scorer.compute(&BTreeMap::new());

    assert_eq!(scorecard.answered, 0);
    assert_eq!(scorecard.global_score, None);
    assert_eq!(scorecard.global_level, None);
    assert_eq!(scorecard.global_percentage, None);
    for function in &scorecard.functions {
        assert_eq!(function.score, None);
        assert!(function.interpretation.is_none());
        for theme in &function.themes {
            assert_eq!(theme.score, None);
            assert_eq!(theme.answered, 0);
        }
    }
}

#[test]
fn unanswered_function_is_excluded_from_the_global_mean() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    let scorecard = scorer.compute(&answer_map(&cyber_only_answers()));

    let cyber = scorecard
        .function(&FunctionId("cyber".to_string()))
        .expect("cyber function present");
    let devsecops = scorecard
        .function(&FunctionId("devsecops".to_string()))
        .expect("devsecops function present");

    let cyber_score = cyber.score.expect("cyber fully answered");
    assert_eq!(devsecops.score, None);
    assert_eq!(devsecops.answered, 0);

    // Uniform 4s over cyber, devsecops excluded: the global mean equals the
    // cyber mean instead of being dragged toward zero.
    let global = scorecard.global_score.expect("one function has answers");
    assert!((global - cyber_score).abs() < 1e-12);
    assert!((global - 4.0).abs() < 1e-12);
}

#[test]
fn theme_scores_follow_the_weighted_mean() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    // Gouvernance theme: weights 3.0, 2.0, 1.0.
    let mut answers = BTreeMap::new();
    answers.insert(
        QuestionId("q-gouv-politique".to_string()),
        ResponseValue::new(4).expect("valid"),
    );
    answers.insert(
        QuestionId("q-gouv-roles".to_string()),
        ResponseValue::new(2).expect("valid"),
    );

    let scorecard = scorer.compute(&answers);
    let cyber = scorecard
        .function(&FunctionId("cyber".to_string()))
        .expect("cyber function present");
    let gouvernance = cyber
        .themes
        .iter()
        .find(|theme| theme.theme.0 == "cyber-gouv")
        .expect("gouvernance theme present");

    let expected = (4.0 * 3.0 + 2.0 * 2.0) / 5.0;
    let score = gouvernance.score.expect("two answers recorded");
    assert!((score - expected).abs() < 1e-12);
    assert_eq!(gouvernance.answered, 2);
    assert_eq!(gouvernance.total, 3);
    assert!((gouvernance.answered_weight - 5.0).abs() < 1e-12);
}

#[test]
fn function_interpretation_matches_the_band_of_its_score() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    let scorecard = scorer.compute(&answer_map(&cyber_only_answers()));
    let cyber = scorecard
        .function(&FunctionId("cyber".to_string()))
        .expect("cyber function present");

    // Uniform 4s put the function in the "Géré" band.
    assert_eq!(cyber.level, Some(MaturityLevel::Gere));
    let interpretation = cyber.interpretation.as_ref().expect("grid row resolves");
    assert_eq!(interpretation.level_label, "Géré");
    assert_eq!(cyber.percentage, Some(80));
}

#[test]
fn partially_answered_theme_keeps_its_completion_counters() {
    let blueprint = blueprint();
    let grid = grid();
    let scorer = Scorer::new(&blueprint, &grid);

    let mut answers = BTreeMap::new();
    answers.insert(
        QuestionId("q-auto-ci".to_string()),
        ResponseValue::new(5).expect("valid"),
    );

    let scorecard = scorer.compute(&answers);
    assert_eq!(scorecard.answered, 1);
    assert!(!scorecard.is_complete());

    let devsecops = scorecard
        .function(&FunctionId("devsecops".to_string()))
        .expect("devsecops function present");
    assert_eq!(devsecops.answered, 1);

    let automation = devsecops
        .themes
        .iter()
        .find(|theme| theme.theme.0 == "devsecops-auto")
        .expect("automation theme present");
    // A single 5 on a weight-3 question owns the whole theme mean.
    assert_eq!(automation.score, Some(5.0));
    assert_eq!(automation.answered, 1);
    assert_eq!(automation.total, 2);
}
