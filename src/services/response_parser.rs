use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::question::{
    option_label, McqRecord, QuizSet, QuizVariant, TrueFalseRecord, MCQ_LABELS, MCQ_OPTION_COUNT,
};

/// Strictly decodes raw provider output. Any deviation from the expected
/// shape rejects the whole response.
pub fn parse_quiz(raw: &str, variant: QuizVariant) -> Result<QuizSet> {
    tracing::debug!(variant = %variant, raw_output = %raw, "parsing provider output");

    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|e| Error::MalformedResponse(format!("output is not valid JSON: {}", e)))?;

    let items = match value {
        JsonValue::Array(items) => items,
        other => {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON array of questions, got {}",
                json_kind(&other)
            )))
        }
    };

    match variant {
        QuizVariant::Mcq => {
            let records: Vec<McqRecord> = decode_records(items)?;
            for (pos, record) in records.iter().enumerate() {
                check_mcq(pos + 1, record)?;
            }
            Ok(QuizSet::Mcq(records))
        }
        QuizVariant::TrueFalse => {
            let records: Vec<TrueFalseRecord> = decode_records(items)?;
            for (pos, record) in records.iter().enumerate() {
                check_true_false(pos + 1, record)?;
            }
            Ok(QuizSet::TrueFalse(records))
        }
    }
}

fn decode_records<T: DeserializeOwned>(items: Vec<JsonValue>) -> Result<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(pos, item)| {
            serde_json::from_value(item).map_err(|e| {
                Error::MalformedResponse(format!("question {} is invalid: {}", pos + 1, e))
            })
        })
        .collect()
}

fn check_mcq(index: usize, record: &McqRecord) -> Result<()> {
    if record.validate().is_err() {
        return Err(Error::MalformedResponse(format!(
            "question {} has {} options, expected {}",
            index,
            record.options.len(),
            MCQ_OPTION_COUNT
        )));
    }

    if !record.labels_in_order() {
        let labels: Vec<&str> = record.options.iter().map(|o| option_label(o)).collect();
        return Err(Error::MalformedResponse(format!(
            "question {} options are labelled {:?}, expected {:?}",
            index, labels, MCQ_LABELS
        )));
    }

    let answer = record.answer.trim();
    if !MCQ_LABELS.contains(&answer) {
        return Err(Error::MalformedResponse(format!(
            "question {} answer {:?} is not one of {:?}",
            index, answer, MCQ_LABELS
        )));
    }
    Ok(())
}

fn check_true_false(index: usize, record: &TrueFalseRecord) -> Result<()> {
    match record.answer.trim() {
        "True" | "False" => Ok(()),
        other => Err(Error::MalformedResponse(format!(
            "question {} answer {:?} is neither \"True\" nor \"False\"",
            index, other
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
