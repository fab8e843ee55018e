//! Quiz request validation, generation and reply checking.

pub mod error;
pub mod generator;
pub mod parser;
pub mod types;
pub mod validator;

pub use error::{GenerationError, QuizError, ValidationError};
pub use generator::QuizGenerator;
pub use parser::parse_quiz_reply;
pub use types::{
    Difficulty, OptionLabel, Question, QuizRequest, QuizResult, RawQuizRequest, FIRST_QUESTION_ID,
};
pub use validator::validate;
