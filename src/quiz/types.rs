use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

/// Id given to the first question of a quiz; later ones count up from here.
pub const FIRST_QUESTION_ID: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Exact, case-sensitive match on the wire literal.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == raw)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "a",
            OptionLabel::B => "b",
            OptionLabel::C => "c",
            OptionLabel::D => "d",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == raw)
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound request exactly as it arrived, before any checks.
///
/// Every field is optional and loosely typed so that the validator, not serde,
/// decides what is wrong and can name the field.
#[derive(Debug, Default, Deserialize)]
pub struct RawQuizRequest {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default, alias = "num_questions")]
    pub question_count: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<Value>,
}

/// A request that passed validation. Only [`crate::quiz::validate`] builds one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
    title: String,
    question_count: NonZeroU32,
    difficulty: Difficulty,
}

impl QuizRequest {
    pub(crate) fn new(title: String, question_count: NonZeroU32, difficulty: Difficulty) -> Self {
        Self {
            title,
            question_count,
            difficulty,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn question_count(&self) -> u32 {
        self.question_count.get()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub prompt_text: String,
    pub options: BTreeMap<OptionLabel, String>,
    #[serde(rename = "correct")]
    pub correct_option: OptionLabel,
}

/// A fully checked quiz: four labelled options per question, an answer drawn
/// from them, and `total_questions == questions.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    total_questions: usize,
    questions: Vec<Question>,
}

impl QuizResult {
    pub(crate) fn new(questions: Vec<Question>) -> Self {
        Self {
            total_questions: questions.len(),
            questions,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
