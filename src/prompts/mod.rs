use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;

use crate::quiz::QuizRequest;

const QUIZ_TEMPLATE_NAME: &str = "quiz_prompt";

macro_rules! template_file {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name))
    };
}

/// JSON schema of the reply the model is told to produce.
pub static OUTPUT_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = json!({
        "title": "QuizOutput",
        "type": "object",
        "properties": {
            "total_questions": {
                "type": "integer",
                "description": "Number of entries in `questions`."
            },
            "questions": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Position of the question, starting at 1."
                        },
                        "question": { "type": "string", "minLength": 1 },
                        "options": {
                            "type": "object",
                            "properties": {
                                "a": { "type": "string", "minLength": 1 },
                                "b": { "type": "string", "minLength": 1 },
                                "c": { "type": "string", "minLength": 1 },
                                "d": { "type": "string", "minLength": 1 }
                            },
                            "required": ["a", "b", "c", "d"],
                            "additionalProperties": false
                        },
                        "correct": { "type": "string", "enum": ["a", "b", "c", "d"] }
                    },
                    "required": ["id", "question", "options", "correct"]
                }
            }
        },
        "required": ["total_questions", "questions"]
    });
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string())
});

#[derive(Serialize)]
struct QuizPromptContext<'a> {
    title: &'a str,
    question_count: u32,
    difficulty: &'static str,
    output_schema: &'a str,
}

/// Compiled instruction template for quiz generation.
pub struct QuizPrompt {
    env: Environment<'static>,
}

impl QuizPrompt {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(QUIZ_TEMPLATE_NAME, template_file!("quiz_prompt.jinja"))?;
        Ok(Self { env })
    }

    pub fn render(&self, request: &QuizRequest) -> Result<String, minijinja::Error> {
        let ctx = QuizPromptContext {
            title: request.title(),
            question_count: request.question_count(),
            difficulty: request.difficulty().as_str(),
            output_schema: OUTPUT_SCHEMA.as_str(),
        };
        self.env.get_template(QUIZ_TEMPLATE_NAME)?.render(ctx)
    }
}
