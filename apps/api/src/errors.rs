use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::AnalysisError;
use crate::analysis::response::ParseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The analysis backend answered, but not with usable candidates.
    #[error("Analysis response error: {0}")]
    Analysis(#[from] ParseError),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::MissingJobDescription | AnalysisError::NoExtractedResumes => {
                AppError::Validation(e.to_string())
            }
            AnalysisError::Backend(inner) => AppError::Llm(inner.to_string()),
            AnalysisError::Response(inner) => AppError::Analysis(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Analysis(e) => {
                tracing::warn!("Analysis response rejected ({}): {e}", e.code());
                if let ParseError::MalformedJson { snippet, .. } = e {
                    tracing::debug!("Offending JSON: {snippet}");
                }
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_RESPONSE_ERROR",
                    format!("Failed to process AI results: {e}. Please try again."),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "AI analysis failed. Please try again.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
