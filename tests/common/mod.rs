#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use quizsmith::{
    api::{self, AppState},
    inference::{ProviderError, TextProvider},
    quiz::QuizGenerator,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub enum StubReply {
    Text(String),
    Fail,
    Hang,
}

/// Deterministic provider that records how often it was asked.
pub struct StubProvider {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Self::new(StubReply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for StubProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::Fail => Err(ProviderError::Status {
                status: 503,
                body: "overloaded".into(),
            }),
            StubReply::Hang => std::future::pending().await,
        }
    }
}

pub fn app_with(provider: Arc<StubProvider>, timeout: Option<Duration>) -> Router {
    let generator = QuizGenerator::with_timeout(provider, timeout).expect("prompt template compiles");
    api::app(AppState {
        generator: Arc::new(generator),
    })
}

pub async fn send(app: Router, request: Request<Body>) -> (u16, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let json = serde_json::from_slice(&bytes).expect("response is JSON");
    (status, json)
}

pub fn get_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn question(id: u64) -> Value {
    json!({
        "id": id,
        "question": format!("Which statement about photosynthesis #{id} is true?"),
        "options": {
            "a": "It releases nitrogen",
            "b": "It produces glucose",
            "c": "It only happens at night",
            "d": "It consumes oxygen"
        },
        "correct": "b"
    })
}

pub fn quiz_reply(count: u64) -> String {
    let questions: Vec<Value> = (1..=count).map(question).collect();
    json!({ "total_questions": count, "questions": questions }).to_string()
}
