use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    api::{types::ApiResponse, AppState},
    inference::ProviderError,
    quiz::{validate, QuizError, QuizResult, RawQuizRequest, ValidationError},
};

pub async fn healthcheck() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok())
}

/// `GET /quiz`. The request comes from the JSON body when there is one,
/// otherwise from the query string.
///
/// Failures always answer `{"message": "error"}`, but unlike a plain 200 the
/// status separates them: 422 for a bad request, 502 when the provider fails
/// or its reply is unusable, 504 when the provider times out.
pub async fn quiz(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    let request_id = Uuid::new_v4().to_string();

    async move {
        match generate_quiz(&state, &uri, &body).await {
            Ok(quiz) => {
                info!(total_questions = quiz.total_questions(), "quiz generated");
                (StatusCode::OK, Json(ApiResponse::success(quiz))).into_response()
            }
            Err(err) => {
                error!(kind = err.kind(), error = %err, "quiz request failed");
                (status_for(&err), Json(ApiResponse::error())).into_response()
            }
        }
    }
    .instrument(info_span!("quiz", %request_id))
    .await
}

async fn generate_quiz(state: &AppState, uri: &Uri, body: &[u8]) -> Result<QuizResult, QuizError> {
    let raw = read_raw_request(uri, body)?;
    let request = validate(raw)?;
    info!(
        title = request.title(),
        question_count = request.question_count(),
        difficulty = %request.difficulty(),
        "generating quiz"
    );
    state.generator.generate(&request).await
}

fn read_raw_request(uri: &Uri, body: &[u8]) -> Result<RawQuizRequest, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Query::<RawQuizRequest>::try_from_uri(uri)
            .map(|Query(raw)| raw)
            .map_err(|rejection| ValidationError::new("query", rejection.body_text()));
    }

    // An array would otherwise fill the struct by position.
    let fields: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|err| ValidationError::new("body", format!("not a JSON object: {err}")))?;

    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ValidationError::new("body", err.to_string()))
}

// The body stays a flat `{"message": "error"}`; only the status tells the
// failure classes apart.
fn status_for(err: &QuizError) -> StatusCode {
    match err {
        QuizError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizError::Provider(ProviderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        QuizError::Provider(_) | QuizError::Generation(_) => StatusCode::BAD_GATEWAY,
        QuizError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
