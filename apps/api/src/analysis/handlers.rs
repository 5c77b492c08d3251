use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::pipeline::{run_analysis, AnalysisReport};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub job_description: String,
}

/// POST /api/v1/analysis
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = run_analysis(&state.workspace, state.analyzer.as_ref(), &req.job_description).await?;
    Ok(Json(report))
}
