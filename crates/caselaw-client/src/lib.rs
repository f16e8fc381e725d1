//! CourtListener-backed case-law lookup.
//!
//! Implements the engine's [`CaseLookup`] seam against the CourtListener
//! opinion search API. Lookup is strictly best-effort: any transport or
//! decoding failure is logged and surfaces as "not found", so a flaky
//! provider degrades an analysis run instead of failing it.

use std::time::Duration;

use async_trait::async_trait;
use brief_types::CaseRecord;
use citation_engine::{CaseLookup, CitationKey};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://www.courtlistener.com";
const SEARCH_PATH: &str = "/api/rest/v4/search/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// Connection settings. The token is optional; CourtListener rate-limits
/// anonymous callers much harder, but the API shape is the same.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
}

impl ClientConfig {
    /// Read the token from `COURTLISTENER_API_TOKEN` if set.
    pub fn from_env() -> Self {
        Self {
            base_url: None,
            api_token: std::env::var("COURTLISTENER_API_TOKEN").ok(),
        }
    }
}

pub struct CourtListenerClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "caseName", default)]
    case_name: String,
    #[serde(default)]
    court: String,
    #[serde(rename = "dateFiled", default)]
    date_filed: String,
    #[serde(default)]
    absolute_url: String,
    #[serde(default)]
    citation: Vec<String>,
}

impl From<SearchResult> for CaseRecord {
    fn from(result: SearchResult) -> Self {
        CaseRecord {
            case_name: result.case_name,
            court: result.court,
            date_filed: result.date_filed,
            absolute_url: result.absolute_url,
            parallel_citations: result.citation,
        }
    }
}

impl CourtListenerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_token: config.api_token,
        })
    }

    /// Search for an opinion by its citation. The first result wins;
    /// CourtListener orders by relevance and an exact citation query
    /// rarely has more than one.
    async fn search(&self, key: &CitationKey) -> Result<Option<CaseRecord>, ClientError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let query = key.query();
        let mut request = self
            .http
            .get(&url)
            .query(&[("type", "o"), ("citation", query.as_str())]);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }
        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().next().map(CaseRecord::from))
    }
}

#[async_trait]
impl CaseLookup for CourtListenerClient {
    async fn lookup(&self, key: &CitationKey) -> Option<CaseRecord> {
        match self.search(key).await {
            Ok(record) => {
                if record.is_none() {
                    tracing::debug!(citation = %key.query(), "no opinion found");
                }
                record
            }
            Err(err) => {
                tracing::warn!(citation = %key.query(), error = %err, "case lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_result_maps_to_case_record() {
        let body = r#"{
            "count": 1,
            "results": [{
                "caseName": "Baltimore v. State",
                "court": "Texas Court of Criminal Appeals",
                "dateFiled": "2024-03-20",
                "absolute_url": "/opinion/123/baltimore-v-state/",
                "citation": ["689 S.W.3d 331"]
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let record = CaseRecord::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(record.case_name, "Baltimore v. State");
        assert_eq!(record.date_filed, "2024-03-20");
        assert_eq!(record.parallel_citations, vec!["689 S.W.3d 331"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        let record = CaseRecord::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(record.case_name, "");
        assert!(record.parallel_citations.is_empty());
    }

    #[test]
    fn test_empty_results() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_degrades_to_none() {
        let client = CourtListenerClient::new(ClientConfig {
            base_url: Some("http://127.0.0.1:1".to_string()),
            api_token: None,
        })
        .unwrap();
        let key = CitationKey {
            volume: "689".to_string(),
            reporter: "S.W.3d".to_string(),
            start_page: 331,
        };
        assert!(client.lookup(&key).await.is_none());
    }
}
