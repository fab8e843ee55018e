use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::quiz::QuizGenerator;

pub mod handlers;
pub mod types;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<QuizGenerator>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/quiz", get(handlers::quiz))
}

/// Routes with the shared layers and state attached, ready to serve.
pub fn app(state: AppState) -> Router {
    router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
