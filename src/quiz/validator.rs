use serde_json::Value;
use std::num::NonZeroU32;

use super::error::ValidationError;
use super::types::{Difficulty, QuizRequest, RawQuizRequest};

/// Checks the inbound shape and produces an immutable [`QuizRequest`].
///
/// Fields are checked in order (title, count, difficulty) and the first
/// offending one is reported.
pub fn validate(raw: RawQuizRequest) -> Result<QuizRequest, ValidationError> {
    let title = validate_title(raw.title)?;
    let question_count = validate_question_count(raw.question_count)?;
    let difficulty = validate_difficulty(raw.difficulty)?;
    Ok(QuizRequest::new(title, question_count, difficulty))
}

fn validate_title(value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new("title", "is required")),
        Some(Value::String(title)) if title.trim().is_empty() => {
            Err(ValidationError::new("title", "must not be empty"))
        }
        Some(Value::String(title)) => Ok(title),
        Some(_) => Err(ValidationError::new("title", "must be text")),
    }
}

fn validate_question_count(value: Option<Value>) -> Result<NonZeroU32, ValidationError> {
    const FIELD: &str = "question_count";

    let count: i64 = match value {
        None | Some(Value::Null) => return Err(ValidationError::new(FIELD, "is required")),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| ValidationError::new(FIELD, format!("must be an integer, got {n}")))?,
        // query strings carry everything as text
        Some(Value::String(s)) => s.trim().parse().map_err(|_| {
            ValidationError::new(FIELD, format!("must be an integer, got {s:?}"))
        })?,
        Some(_) => return Err(ValidationError::new(FIELD, "must be an integer")),
    };

    if count <= 0 {
        return Err(ValidationError::new(
            FIELD,
            format!("must be a positive integer, got {count}"),
        ));
    }

    u32::try_from(count)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ValidationError::new(FIELD, format!("{count} is too large")))
}

fn validate_difficulty(value: Option<Value>) -> Result<Difficulty, ValidationError> {
    const FIELD: &str = "difficulty";

    match value {
        None | Some(Value::Null) => Err(ValidationError::new(FIELD, "is required")),
        Some(Value::String(s)) => Difficulty::parse(&s).ok_or_else(|| {
            ValidationError::new(FIELD, format!("must be one of easy, medium, hard; got {s:?}"))
        }),
        Some(_) => Err(ValidationError::new(FIELD, "must be text")),
    }
}
