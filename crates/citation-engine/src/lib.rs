//! Citation extraction and verification classification for appellate
//! briefs.
//!
//! Given the extracted page text of a brief, the engine bounds the
//! argument section, segments it into sentences and block quotes,
//! detects case and statute citations, resolves short forms and `id.`
//! back-references, links each citation to the proposition it supports,
//! and assigns every citation a verification strategy for downstream
//! checking. External case records come from a caller-supplied
//! [`CaseLookup`]; the engine itself never performs I/O beyond that
//! seam.

pub mod casename;
pub mod config;
pub mod detect;
pub mod error;
pub mod link;
pub mod lookup;
pub mod patterns;
pub mod resolve;
pub mod section;
pub mod segment;
pub mod toa;
pub mod verify;

use brief_types::{Citation, PageText, Section};

pub use config::EngineConfig;
pub use error::{Diagnostic, EngineError};
pub use lookup::{CachingLookup, CaseLookup, CitationKey, NoopLookup};

/// Result of one analysis run: the structured section plus everything
/// that degraded along the way.
#[derive(Debug)]
pub struct Analysis {
    pub section: Section,
    pub diagnostics: Vec<Diagnostic>,
}

/// The whole pipeline behind one call. Stateless between runs; safe to
/// share across requests.
#[derive(Debug, Clone, Default)]
pub struct BriefAnalyzer {
    config: EngineConfig,
}

impl BriefAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one brief. Fails only when the argument section cannot be
    /// located; every other problem is flagged on the output instead.
    pub async fn analyze(
        &self,
        pages: &[PageText],
        lookup: &dyn CaseLookup,
    ) -> Result<Analysis, EngineError> {
        let span = section::extract_section(pages, &self.config)?;
        tracing::debug!(
            start_page = span.start_page,
            end_page = span.end_page,
            lines = span.lines.len(),
            "argument section located"
        );

        let toa_keys = toa::toa_citation_keys(pages, &self.config);
        if !toa_keys.is_empty() {
            tracing::debug!(
                keys = toa_keys.len(),
                "prefetching table-of-authorities records"
            );
            toa::warm_lookup(toa_keys, lookup, &self.config).await;
        }

        let records = segment::segment_section(&span, &self.config);
        let (mut items, mut diagnostics) = link::link_items(&records);

        let citations: Vec<&mut Citation> = items
            .iter_mut()
            .flat_map(|item| item.citations.iter_mut())
            .collect();
        let mut resolve_diags =
            resolve::resolve_citations(citations, lookup, &self.config).await;
        diagnostics.append(&mut resolve_diags);

        verify::assign_strategies(&mut items);

        let section = Section::new(span.start_page, span.end_page, items);
        tracing::debug!(
            items = section.items.len(),
            citations = section.metadata.total_citations,
            diagnostics = diagnostics.len(),
            "analysis complete"
        );
        Ok(Analysis {
            section,
            diagnostics,
        })
    }
}
