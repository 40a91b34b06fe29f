//! Question answering endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{AnswerRequest, AnswerResponse, ApiError, Json};

/// POST /v1/answer
pub async fn create_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    debug!(question_len = request.question.len(), "Answer request received");

    if request.question.trim().is_empty() {
        return Err(ApiError::bad_request("question must not be empty").with_param("question"));
    }

    let answer = state.orchestrator.answer(&request.question).await?;

    Ok(Json(answer.into()))
}
