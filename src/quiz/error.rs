use thiserror::Error;

use crate::inference::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// The model answered, but not with a usable quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("malformed-output: {0}")]
    MalformedOutput(String),
    #[error("schema-mismatch: {0}")]
    SchemaMismatch(String),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MalformedOutput(_) => "malformed-output",
            GenerationError::SchemaMismatch(_) => "schema-mismatch",
        }
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to render quiz prompt: {0}")]
    Prompt(#[from] minijinja::Error),
}

impl QuizError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::Validation(_) => "validation",
            QuizError::Provider(ProviderError::Timeout(_)) => "provider-timeout",
            QuizError::Provider(_) => "provider",
            QuizError::Generation(err) => err.kind(),
            QuizError::Prompt(_) => "prompt",
        }
    }
}
