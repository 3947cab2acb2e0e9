use std::io::Read;

use serde::Deserialize;

use super::blueprint::QuestionnaireBlueprint;
use super::domain::{QuestionId, ResponseValue};

/// Errors raised while importing a responses export.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("unknown question id '{0}'")]
    UnknownQuestion(String),
    #[error("invalid response value '{value}' for question '{question}'")]
    InvalidValue { question: String, value: String },
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    #[serde(rename = "Question ID")]
    question_id: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Parse a `Question ID,Value` CSV export into validated answers.
///
/// Rows are returned in file order; when a question appears twice the caller
/// keeps the later row, matching the overwrite semantics of the recording
/// endpoint.
pub fn parse_responses<R: Read>(
    reader: R,
    blueprint: &QuestionnaireBlueprint,
) -> Result<Vec<(QuestionId, ResponseValue)>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut responses = Vec::new();

    for record in csv_reader.deserialize::<ResponseRow>() {
        let row = record?;
        let question_id = QuestionId(row.question_id.clone());

        if blueprint.question(&question_id).is_none() {
            return Err(ImportError::UnknownQuestion(row.question_id));
        }

        let value = row
            .value
            .parse::<u8>()
            .ok()
            .and_then(|raw| ResponseValue::new(raw).ok())
            .ok_or_else(|| ImportError::InvalidValue {
                question: row.question_id,
                value: row.value,
            })?;

        responses.push((question_id, value));
    }

    Ok(responses)
}
