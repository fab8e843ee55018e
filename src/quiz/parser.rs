use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use std::collections::BTreeMap;
use std::fmt;

use super::error::GenerationError;
use super::types::{OptionLabel, Question, QuizResult, FIRST_QUESTION_ID};

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern compiles")
});

#[derive(Deserialize)]
struct ReplyQuiz {
    total_questions: u64,
    questions: Vec<ReplyQuestion>,
}

#[derive(Deserialize)]
struct ReplyQuestion {
    id: u64,
    #[serde(alias = "prompt_text")]
    question: String,
    options: OptionEntries,
    #[serde(alias = "correct_option")]
    correct: String,
}

/// Option entries in reply order, repeated labels included.
struct OptionEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OptionEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OptionEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping option labels to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(4));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    entries.push(entry);
                }
                Ok(OptionEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Turns the model's free-text reply into a checked [`QuizResult`].
///
/// Text that is not JSON at all is `MalformedOutput`; JSON of the wrong shape,
/// or a quiz that breaks any structural rule, is `SchemaMismatch`.
pub fn parse_quiz_reply(reply: &str) -> Result<QuizResult, GenerationError> {
    let payload = extract_json_payload(reply);

    let quiz: ReplyQuiz = serde_json::from_str(payload).map_err(|err| match err.classify() {
        Category::Data => GenerationError::SchemaMismatch(err.to_string()),
        Category::Syntax | Category::Eof | Category::Io => {
            GenerationError::MalformedOutput(err.to_string())
        }
    })?;

    if quiz.questions.is_empty() {
        return Err(GenerationError::SchemaMismatch("quiz has no questions".into()));
    }

    if quiz.total_questions != quiz.questions.len() as u64 {
        return Err(GenerationError::SchemaMismatch(format!(
            "total_questions is {} but {} questions were returned",
            quiz.total_questions,
            quiz.questions.len()
        )));
    }

    let questions = quiz
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| check_question(index, question))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuizResult::new(questions))
}

/// Strips a Markdown code fence if the model wrapped its JSON in one.
fn extract_json_payload(reply: &str) -> &str {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    FENCED_BLOCK
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

fn check_question(index: usize, question: ReplyQuestion) -> Result<Question, GenerationError> {
    let expected_id = FIRST_QUESTION_ID as u64 + index as u64;
    let mismatch = |reason: String| {
        GenerationError::SchemaMismatch(format!("question {expected_id}: {reason}"))
    };

    if question.id != expected_id {
        return Err(mismatch(format!("id is {}, expected {expected_id}", question.id)));
    }

    if question.question.trim().is_empty() {
        return Err(mismatch("question text is empty".into()));
    }

    let mut options = BTreeMap::new();
    for (label, text) in question.options.0 {
        let parsed = OptionLabel::parse(&label)
            .ok_or_else(|| mismatch(format!("unknown option label {label:?}")))?;
        if text.trim().is_empty() {
            return Err(mismatch(format!("option {label} is empty")));
        }
        if options.insert(parsed, text).is_some() {
            return Err(mismatch(format!("option label {label} appears more than once")));
        }
    }

    if options.len() != OptionLabel::ALL.len() {
        return Err(mismatch(format!(
            "has {} options, expected {}",
            options.len(),
            OptionLabel::ALL.len()
        )));
    }

    let correct_option = OptionLabel::parse(&question.correct)
        .filter(|label| options.contains_key(label))
        .ok_or_else(|| {
            mismatch(format!(
                "correct answer {:?} is not one of the option labels",
                question.correct
            ))
        })?;

    Ok(Question {
        id: expected_id as u32,
        prompt_text: question.question,
        options,
        correct_option,
    })
}
