use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use osprey_analysis::{PipelineError, ProfileReport};
use osprey_scraper::ScrapeError;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeQuery {
    /// `?refresh=true` bypasses the cache read and recomputes.
    #[serde(default)]
    pub refresh: bool,
}

pub(super) async fn analyze_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ApiResponse<ProfileReport>>, ApiError> {
    let report = state
        .pipeline
        .analyze(&username, query.refresh)
        .await
        .map_err(|e| {
            tracing::error!(username = %username, error = %e, "profile analysis failed");
            ApiError::new(error_code(&e), e.to_string())
        })?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::now(),
    }))
}

/// Maps fatal pipeline errors onto the response codes [`ApiError`]'s
/// renderer understands.
fn error_code(error: &PipelineError) -> &'static str {
    match error {
        PipelineError::Fetch(ScrapeError::NotFound { .. }) => "not_found",
        PipelineError::Fetch(ScrapeError::Unauthorized { .. }) => "unauthorized",
        PipelineError::Fetch(ScrapeError::RateLimited) => "rate_limited",
        PipelineError::Fetch(_) => "bad_gateway",
        PipelineError::Session(_) | PipelineError::Llm(_) => "internal_error",
    }
}
