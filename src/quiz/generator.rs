use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::error::QuizError;
use super::parser::parse_quiz_reply;
use super::types::{QuizRequest, QuizResult};
use crate::config::AppConfig;
use crate::inference::{ProviderError, TextProvider};
use crate::prompts::QuizPrompt;

/// Prompt -> provider -> parse. Holds nothing that changes between requests.
pub struct QuizGenerator {
    provider: Arc<dyn TextProvider>,
    prompt: QuizPrompt,
    timeout: Option<Duration>,
}

impl QuizGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, config: &AppConfig) -> Result<Self, QuizError> {
        Self::with_timeout(provider, config.provider_timeout)
    }

    pub fn with_timeout(
        provider: Arc<dyn TextProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self, QuizError> {
        Ok(Self {
            provider,
            prompt: QuizPrompt::new()?,
            timeout,
        })
    }

    pub async fn generate(&self, request: &QuizRequest) -> Result<QuizResult, QuizError> {
        let prompt = self.prompt.render(request)?;
        let reply = self.complete(&prompt).await?;
        debug!(reply_len = reply.len(), "provider replied");

        let quiz = parse_quiz_reply(&reply)?;

        if quiz.total_questions() != request.question_count() as usize {
            warn!(
                requested = request.question_count(),
                returned = quiz.total_questions(),
                "model returned a different number of questions than requested"
            );
        }

        Ok(quiz)
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        match self.timeout {
            Some(limit) => timeout(limit, self.provider.complete(prompt))
                .await
                .map_err(|_| ProviderError::Timeout(limit))?,
            None => self.provider.complete(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{validate, GenerationError, OptionLabel, RawQuizRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedProvider {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn new(reply: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextProvider for CannedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct SilentProvider;

    #[async_trait]
    impl TextProvider for SilentProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            std::future::pending().await
        }
    }

    fn request(count: u32) -> QuizRequest {
        validate(RawQuizRequest {
            title: Some(json!("Photosynthesis")),
            question_count: Some(json!(count)),
            difficulty: Some(json!("easy")),
        })
        .unwrap()
    }

    fn reply(count: u64) -> String {
        let questions: Vec<_> = (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "question": format!("Question {id}"),
                    "options": { "a": "one", "b": "two", "c": "three", "d": "four" },
                    "correct": "d"
                })
            })
            .collect();
        json!({ "total_questions": count, "questions": questions }).to_string()
    }

    #[tokio::test]
    async fn sends_rendered_prompt_and_parses_reply() {
        let provider = CannedProvider::new(reply(3));
        let generator = QuizGenerator::with_timeout(provider.clone(), None).unwrap();

        let quiz = generator.generate(&request(3)).await.unwrap();
        assert_eq!(quiz.total_questions(), 3);
        assert!(quiz
            .questions()
            .iter()
            .all(|q| q.correct_option == OptionLabel::D));

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Quiz title: Photosynthesis"));
    }

    #[tokio::test]
    async fn count_drift_is_not_an_error() {
        let generator = QuizGenerator::with_timeout(CannedProvider::new(reply(2)), None).unwrap();
        let quiz = generator.generate(&request(4)).await.unwrap();
        assert_eq!(quiz.total_questions(), 2);
    }

    #[tokio::test]
    async fn surfaces_generation_errors() {
        let generator =
            QuizGenerator::with_timeout(CannedProvider::new("no quiz today"), None).unwrap();
        let err = generator.generate(&request(1)).await.unwrap_err();
        assert!(matches!(
            err,
            QuizError::Generation(GenerationError::MalformedOutput(_))
        ));
        assert_eq!(err.kind(), "malformed-output");
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_timeout() {
        let generator =
            QuizGenerator::with_timeout(Arc::new(SilentProvider), Some(Duration::from_secs(5)))
                .unwrap();
        let err = generator.generate(&request(1)).await.unwrap_err();
        assert!(matches!(err, QuizError::Provider(ProviderError::Timeout(_))));
        assert_eq!(err.kind(), "provider-timeout");
    }
}
