//! Request and response models for the analysis API.

use brief_types::{PageText, Section};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Extracted page text in document order.
    pub pages: Vec<PageText>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub section: Section,
    /// Human-readable descriptions of everything that degraded during
    /// the run.
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
