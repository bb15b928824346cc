// POST /api/generate-keywords: run a keyword batch for the given topics.
//
// Returns 200 with one result per topic, even when some topics failed.
// Returns 400 if primaryKeywords is missing, not a list of strings, or empty.
// Returns 500 only if the batch itself breaks down.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::BatchError;
use crate::models::BatchResult;
use crate::pipeline::parse_topics;
use crate::web::{api_error, AppState};

const BAD_REQUEST_MESSAGE: &str = "Please provide at least one primary keyword";

#[derive(Serialize)]
pub struct GenerateKeywordsResponse {
    pub results: BatchResult,
}

/// POST /api/generate-keywords
pub async fn generate_keywords(State(state): State<AppState>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Rejected unparseable keyword request");
            return api_error(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE);
        }
    };

    let topics = match parse_topics(&request) {
        Ok(topics) => topics,
        Err(e) => {
            warn!(error = %e, "Rejected keyword request");
            return api_error(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE);
        }
    };

    match state.pipeline.run_batch(&topics).await {
        Ok(results) => Json(GenerateKeywordsResponse { results }).into_response(),
        Err(BatchError::Input(e)) => {
            warn!(error = %e, "Rejected keyword request");
            api_error(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
        }
        Err(e @ BatchError::Internal(_)) => {
            error!(error = %e, "Error generating keywords");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to generate keywords",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
