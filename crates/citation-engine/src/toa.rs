//! Table-of-authorities harvesting.
//!
//! A brief lists the cases it relies on before the argument begins.
//! Harvesting full citations from that listing lets a run warm its
//! case-record cache up front, so resolution inside the argument section
//! finds the records already fetched.

use std::collections::HashSet;

use brief_types::PageText;
use futures::stream::{self, StreamExt};

use crate::config::EngineConfig;
use crate::lookup::{CaseLookup, CitationKey};
use crate::patterns::CASE_CITATION;
use crate::section;
use crate::segment;

/// Text of the cases listing: everything between the table's heading and
/// the first subsection or section heading after it. A "Cases"
/// subheading narrows the span to the entries that follow it.
fn cases_listing(pages: &[PageText], config: &EngineConfig) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    let mut started = false;

    'pages: for page in pages {
        for raw_line in page.text.lines() {
            if !started {
                if section::matches_any(raw_line, &config.toa_headings) {
                    started = true;
                }
                continue;
            }
            if section::matches_any(raw_line, &config.toa_end_headings) {
                break 'pages;
            }
            if section::matches_heading(raw_line, "Cases") {
                lines.clear();
                continue;
            }
            lines.push(raw_line);
        }
    }

    if !started {
        return None;
    }
    Some(lines.join("\n"))
}

/// Distinct full-citation keys from the table of authorities, in listing
/// order. A brief without a table yields an empty list.
pub fn toa_citation_keys(pages: &[PageText], config: &EngineConfig) -> Vec<CitationKey> {
    let Some(listing) = cases_listing(pages, config) else {
        return Vec::new();
    };
    let text = segment::normalize_text(&listing);

    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for caps in CASE_CITATION.captures_iter(&text) {
        let (Some(volume), Some(reporter), Some(page)) = (
            caps.name("volume"),
            caps.name("reporter"),
            caps.name("page"),
        ) else {
            continue;
        };
        let Ok(start_page) = page.as_str().parse() else {
            continue;
        };
        let key = CitationKey {
            volume: volume.as_str().to_string(),
            reporter: reporter.as_str().to_string(),
            start_page,
        };
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

/// Ask the lookup for each key once, bounded by the configured
/// concurrency. The fetched records land in whatever memoization the
/// lookup carries; argument-section resolution then hits that cache.
pub async fn warm_lookup(keys: Vec<CitationKey>, lookup: &dyn CaseLookup, config: &EngineConfig) {
    stream::iter(keys)
        .for_each_concurrent(config.lookup_concurrency.max(1), |key| async move {
            lookup.lookup(&key).await;
        })
        .await;
}
