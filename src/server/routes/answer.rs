//! Batch answer endpoint

use axum::{extract::State, http::HeaderMap, Json};
use std::time::Instant;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::query::{AnswerMode, RunRequest};
use crate::types::response::RunResponse;

/// Header carrying a per-request answer mode override
const ANSWER_MODE_HEADER: &str = "x-answer-mode";

/// POST /api/v1/run - Answer a batch of questions about one document
pub async fn run(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>> {
    let start = Instant::now();

    verify_api_key(&headers, &state.config().server)?;

    let mode = headers
        .get(ANSWER_MODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(AnswerMode::parse)
        .unwrap_or(state.config().answer.default_mode);

    tracing::info!(
        "Run: {} question(s) about {} (mode: {})",
        request.questions.len(),
        request.documents,
        mode.as_str()
    );

    let outcomes = state
        .engine()
        .answer_questions(&request.documents, &request.questions, mode)
        .await?;

    let answers = outcomes.into_iter().map(|o| o.answer).collect();

    tracing::info!("Run completed in {}ms", start.elapsed().as_millis());

    Ok(Json(RunResponse { answers }))
}

/// Check the shared-secret bearer token when one is configured
fn verify_api_key(headers: &HeaderMap, config: &ServerConfig) -> Result<()> {
    let Some(expected) = config.api_key.as_deref() else {
        return Ok(());
    };

    let presented = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}
