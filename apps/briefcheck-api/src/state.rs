//! Application state shared across requests.

use std::sync::Arc;

use anyhow::Result;
use caselaw_client::{ClientConfig, CourtListenerClient};
use citation_engine::{BriefAnalyzer, CaseLookup, EngineConfig};

pub struct AppState {
    pub analyzer: BriefAnalyzer,
    pub lookup: Arc<dyn CaseLookup>,
}

impl AppState {
    /// Production state: default engine configuration and a
    /// CourtListener client configured from the environment.
    pub fn new() -> Result<Self> {
        let client = CourtListenerClient::new(ClientConfig::from_env())?;
        Ok(Self::with_lookup(Arc::new(client)))
    }

    pub fn with_lookup(lookup: Arc<dyn CaseLookup>) -> Self {
        Self {
            analyzer: BriefAnalyzer::new(EngineConfig::default()),
            lookup,
        }
    }
}
