//! HTTP handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use citation_engine::CachingLookup;

use crate::error::ApiError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, HealthResponse};
use crate::state::AppState;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Analyze one brief: extract the argument section, its citations, and
/// a verification strategy for each.
pub async fn analyze_brief(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if request.pages.is_empty() {
        return Err(ApiError::InvalidRequest("pages must not be empty".into()));
    }
    tracing::info!(pages = request.pages.len(), "analyzing brief");

    // One cache per request: repeated citations of the same case cost a
    // single provider call.
    let lookup = CachingLookup::new(Arc::clone(&state.lookup));
    let analysis = state.analyzer.analyze(&request.pages, &lookup).await?;

    Ok(Json(AnalyzeResponse {
        section: analysis.section,
        diagnostics: analysis
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect(),
    }))
}
