//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::analysis::generator::generate_report;
use crate::analysis::models::AnalysisRequest;
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::models::envelope::ApiResponse;
use crate::state::AppState;
use crate::usage::user_id_from;

/// POST /api/v1/analysis
///
/// Validates the submission, asks the model for an impact report and returns
/// it parsed, cleaned and defaulted.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisReport>>, AppError> {
    let Json(request) = body?;

    let report = generate_report(
        state.fetcher.as_deref(),
        &state.usage,
        user_id_from(&headers),
        &request,
    )
    .await?;

    Ok(ApiResponse::ok(report))
}
