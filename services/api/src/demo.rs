use crate::infra::{InMemoryCompletionPublisher, InMemoryEvaluationRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use maturix::assessments::evaluations::{
    parse_responses, EvaluationService, FunctionScore, InterpretationGrid, QuestionId,
    QuestionnaireBlueprint, ResponseEntry, ResponseValue, Scorecard, Scorer,
};
use maturix::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company evaluated during the demo
    #[arg(long, default_value = "Atelier Demo SAS")]
    pub(crate) company: String,
    /// Evaluation start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) started_on: Option<NaiveDate>,
    /// Completion date (YYYY-MM-DD). Defaults to the start date.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) completed_on: Option<NaiveDate>,
    /// Optional responses export (Question ID,Value) instead of sample answers
    #[arg(long)]
    pub(crate) responses_csv: Option<PathBuf>,
    /// Include per-theme detail in the output
    #[arg(long)]
    pub(crate) show_themes: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MaturityReportArgs {
    /// Responses export to score (Question ID,Value)
    #[arg(long)]
    pub(crate) responses_csv: PathBuf,
    /// Company name echoed in the report header
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Include per-theme detail in the output
    #[arg(long)]
    pub(crate) show_themes: bool,
}

pub(crate) fn run_maturity_report(args: MaturityReportArgs) -> Result<(), AppError> {
    let MaturityReportArgs {
        responses_csv,
        company,
        show_themes,
    } = args;

    let blueprint = QuestionnaireBlueprint::standard();
    let grid = InterpretationGrid::standard();

    let file = File::open(responses_csv)?;
    let parsed = parse_responses(BufReader::new(file), &blueprint)?;
    let answers: BTreeMap<QuestionId, ResponseValue> = parsed.into_iter().collect();

    let scorecard = Scorer::new(&blueprint, &grid).compute(&answers);
    render_scorecard(company.as_deref().unwrap_or("(non renseigné)"), &scorecard, show_themes);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        started_on,
        completed_on,
        responses_csv,
        show_themes,
    } = args;

    let started_on = started_on.unwrap_or_else(|| Local::now().date_naive());
    let completed_on = completed_on.unwrap_or(started_on);

    println!("Maturity assessment demo");

    let blueprint = QuestionnaireBlueprint::standard();
    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let notifier = Arc::new(InMemoryCompletionPublisher::default());
    let service = EvaluationService::new(
        repository,
        notifier.clone(),
        blueprint.clone(),
        InterpretationGrid::standard(),
    )?;

    let record = service.open(&company, started_on)?;
    println!("- opened evaluation {} for {}", record.id, record.company);

    let entries = match responses_csv {
        Some(path) => {
            let file = File::open(path)?;
            parse_responses(BufReader::new(file), &blueprint)?
                .into_iter()
                .map(|(question_id, value)| ResponseEntry {
                    question_id,
                    value: value.get(),
                })
                .collect()
        }
        None => sample_answers(&blueprint),
    };

    let recorded = service.record_responses(&record.id, &entries)?;
    println!(
        "- recorded {}/{} answers",
        recorded.responses.len(),
        blueprint.question_count()
    );

    let finalized = service.finalize(&record.id, completed_on)?;
    println!("- finalized on {completed_on} (status: {})", finalized.status.label());

    if let Some(scorecard) = &finalized.scorecard {
        render_scorecard(&finalized.company, scorecard, show_themes);
    }

    let notices = notifier.notices();
    println!("\n{} completion notice(s) dispatched", notices.len());

    Ok(())
}

/// Deterministic mid-range answer sheet used when no export is supplied.
fn sample_answers(blueprint: &QuestionnaireBlueprint) -> Vec<ResponseEntry> {
    let pattern = [4, 3, 5, 2];
    blueprint
        .question_ids()
        .enumerate()
        .map(|(index, question_id)| ResponseEntry {
            question_id: question_id.clone(),
            value: pattern[index % pattern.len()],
        })
        .collect()
}

fn render_scorecard(company: &str, scorecard: &Scorecard, show_themes: bool) {
    println!("\nScorecard — {company}");
    println!(
        "- completion: {}/{} questions answered",
        scorecard.answered, scorecard.total
    );

    match (scorecard.global_score, &scorecard.global_level_label) {
        (Some(score), Some(label)) => {
            let pct = scorecard.global_percentage.unwrap_or_default();
            println!("- global score: {score:.2}/5 ({pct}%) — {label}");
        }
        _ => println!("- global score: insufficient data"),
    }

    for function in &scorecard.functions {
        render_function(function, show_themes);
    }
}

fn render_function(function: &FunctionScore, show_themes: bool) {
    match (function.score, &function.level_label) {
        (Some(score), Some(label)) => {
            println!(
                "- {}: {score:.2}/5 — {label} ({}/{} answered)",
                function.function_label, function.answered, function.total
            );
        }
        _ => {
            println!(
                "- {}: insufficient data ({}/{} answered)",
                function.function_label, function.answered, function.total
            );
        }
    }

    if let Some(interpretation) = &function.interpretation {
        println!("    {}", interpretation.description);
        println!("    Recommandation: {}", interpretation.recommendation);
    }

    if show_themes {
        for theme in &function.themes {
            match theme.score {
                Some(score) => println!(
                    "    - {}: {score:.2}/5 ({}/{} answered)",
                    theme.theme_label, theme.answered, theme.total
                ),
                None => println!(
                    "    - {}: insufficient data ({}/{} answered)",
                    theme.theme_label, theme.answered, theme.total
                ),
            }
        }
    }
}
