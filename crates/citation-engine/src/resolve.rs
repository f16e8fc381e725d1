//! Reference resolution across the document's citation sequence.
//!
//! Full citations establish identities; short forms resolve against the
//! most recent full citation sharing their volume/reporter key; `id.`
//! inherits from whatever citation came immediately before. External
//! records are prefetched concurrently, one request per distinct key,
//! then applied in a single ordered pass so resolution is deterministic.

use std::collections::{HashMap, HashSet};

use brief_types::{CaseRecord, Citation, CitationKind, ResolutionType};
use futures::stream::{self, StreamExt};

use crate::casename::case_names_match;
use crate::config::EngineConfig;
use crate::error::Diagnostic;
use crate::lookup::{CaseLookup, CitationKey};

/// What a later short or id. citation can inherit.
#[derive(Debug, Clone)]
struct Antecedent {
    kind: CitationKind,
    case_name: Option<String>,
    volume: Option<String>,
    reporter: Option<String>,
    start_page: Option<u32>,
    pinpoint: Option<String>,
    record: Option<CaseRecord>,
}

impl Antecedent {
    fn of(citation: &Citation) -> Self {
        Self {
            kind: citation.kind,
            case_name: citation.case_name.clone(),
            volume: citation.volume.clone(),
            reporter: citation.reporter.clone(),
            start_page: citation.start_page,
            pinpoint: citation.pinpoint.clone(),
            record: citation.external_record.clone(),
        }
    }
}

fn full_case_key(citation: &Citation) -> Option<CitationKey> {
    if citation.kind != CitationKind::Case || citation.resolution_type != ResolutionType::Full {
        return None;
    }
    Some(CitationKey {
        volume: citation.volume.clone()?,
        reporter: citation.reporter.clone()?,
        start_page: citation.start_page?,
    })
}

/// Fetch records for every distinct full-citation key, bounded by the
/// configured concurrency.
async fn prefetch(
    citations: &[&mut Citation],
    lookup: &dyn CaseLookup,
    config: &EngineConfig,
) -> HashMap<CitationKey, Option<CaseRecord>> {
    let keys: HashSet<CitationKey> = citations
        .iter()
        .filter_map(|c| full_case_key(c))
        .collect();

    stream::iter(keys)
        .map(|key| async move {
            let record = lookup.lookup(&key).await;
            (key, record)
        })
        .buffer_unordered(config.lookup_concurrency.max(1))
        .collect()
        .await
}

/// Leading page number of a pinpoint, which may be a range ("91-92").
fn pinpoint_page(pinpoint: &str) -> Option<u32> {
    let digits: String = pinpoint.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn validate_pinpoint(
    citation: &mut Citation,
    config: &EngineConfig,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if citation.kind != CitationKind::Case {
        return;
    }
    let (Some(start), Some(pin)) = (citation.start_page, citation.pinpoint.clone()) else {
        return;
    };
    let Some(page) = pinpoint_page(&pin) else {
        return;
    };
    if page < start || page > start + config.pinpoint_window {
        citation.invalid_pinpoint = true;
        citation.flag_for_review("pinpoint outside plausible page range");
        let diag = Diagnostic::InvalidPinpoint {
            text: citation.text.clone(),
            pinpoint: pin,
        };
        tracing::warn!("{}", diag);
        diagnostics.push(diag);
    }
}

/// Resolve every citation in document order, attaching external records
/// and propagating identities into short and id. forms.
pub async fn resolve_citations(
    citations: Vec<&mut Citation>,
    lookup: &dyn CaseLookup,
    config: &EngineConfig,
) -> Vec<Diagnostic> {
    let fetched = prefetch(&citations, lookup, config).await;

    let mut diagnostics = Vec::new();
    let mut by_key: HashMap<(String, String), Antecedent> = HashMap::new();
    let mut last: Option<Antecedent> = None;

    for citation in citations {
        match (citation.kind, citation.resolution_type) {
            (CitationKind::Case, ResolutionType::Full) => {
                if let Some(key) = full_case_key(citation) {
                    match fetched.get(&key).cloned().flatten() {
                        Some(record) => {
                            let extracted = citation.case_name.as_deref().unwrap_or("");
                            if !case_names_match(extracted, &record.case_name) {
                                citation
                                    .flag_for_review("case name does not match external record");
                            }
                            citation.external_record = Some(record);
                        }
                        None => citation.flag_for_review("no external record found"),
                    }
                    let antecedent = Antecedent::of(citation);
                    by_key.insert((key.volume, key.reporter), antecedent.clone());
                    last = Some(antecedent);
                } else {
                    citation.flag_for_review("incomplete citation fields");
                    last = Some(Antecedent::of(citation));
                }
            }
            (CitationKind::Case, ResolutionType::Short) => {
                let key = citation
                    .volume
                    .clone()
                    .zip(citation.reporter.clone());
                match key.and_then(|k| by_key.get(&k).cloned()) {
                    Some(antecedent) => {
                        citation.case_name = antecedent.case_name.clone();
                        citation.start_page = antecedent.start_page;
                        citation.external_record = antecedent.record.clone();
                        last = Some(Antecedent::of(citation));
                    }
                    None => {
                        let diag = Diagnostic::UnresolvedShortCitation {
                            text: citation.text.clone(),
                        };
                        tracing::warn!("{}", diag);
                        diagnostics.push(diag);
                        citation.flag_for_review("unresolved short citation");
                        last = Some(Antecedent::of(citation));
                    }
                }
            }
            (_, ResolutionType::Id) => match last.clone() {
                Some(antecedent) => {
                    citation.kind = antecedent.kind;
                    citation.case_name = antecedent.case_name.clone();
                    citation.volume = antecedent.volume.clone();
                    citation.reporter = antecedent.reporter.clone();
                    citation.start_page = antecedent.start_page;
                    citation.external_record = antecedent.record.clone();
                    // A bare "Id." points at the same page as its
                    // antecedent; "Id. at N" keeps its own pin.
                    if citation.pinpoint.is_none() {
                        citation.pinpoint = antecedent.pinpoint.clone();
                    }
                    last = Some(antecedent);
                }
                None => {
                    let diag = Diagnostic::UnresolvedId {
                        text: citation.text.clone(),
                    };
                    tracing::warn!("{}", diag);
                    diagnostics.push(diag);
                    citation.flag_for_review("id. citation with no antecedent");
                }
            },
            (CitationKind::Statute, _) => {
                last = Some(Antecedent::of(citation));
            }
        }

        validate_pinpoint(citation, config, &mut diagnostics);
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::testing::{key, record, StaticLookup};
    use crate::lookup::NoopLookup;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn full(name: &str, volume: &str, reporter: &str, page: u32, pin: Option<&str>) -> Citation {
        Citation {
            text: format!("{}, {} {} {}", name, volume, reporter, page),
            kind: CitationKind::Case,
            resolution_type: ResolutionType::Full,
            volume: Some(volume.to_string()),
            reporter: Some(reporter.to_string()),
            start_page: Some(page),
            case_name: Some(name.to_string()),
            signal: None,
            pinpoint: pin.map(str::to_string),
            parenthetical: None,
            external_record: None,
            needs_review: false,
            review_reason: None,
            invalid_pinpoint: false,
            verification_strategy: None,
        }
    }

    fn short(name: &str, volume: &str, reporter: &str, pin: &str) -> Citation {
        let mut c = full(name, volume, reporter, 0, Some(pin));
        c.resolution_type = ResolutionType::Short;
        c.start_page = None;
        c.text = format!("{}, {} {} at {}", name, volume, reporter, pin);
        c
    }

    fn id_cite(pin: Option<&str>) -> Citation {
        let mut c = full("", "1", "X", 0, pin);
        c.resolution_type = ResolutionType::Id;
        c.case_name = None;
        c.volume = None;
        c.reporter = None;
        c.start_page = None;
        c.text = "Id.".to_string();
        c
    }

    #[tokio::test]
    async fn test_full_citation_gets_record() {
        let lookup = StaticLookup::new(vec![(
            key("689", "S.W.3d", 331),
            record("Baltimore v. State"),
        )]);
        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, None);
        let diags =
            resolve_citations(vec![&mut c], &lookup, &EngineConfig::default()).await;
        assert!(diags.is_empty());
        assert!(!c.needs_review);
        assert_eq!(
            c.external_record.as_ref().unwrap().case_name,
            "Baltimore v. State"
        );
    }

    #[tokio::test]
    async fn test_missing_record_flags_review() {
        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, None);
        resolve_citations(vec![&mut c], &NoopLookup, &EngineConfig::default()).await;
        assert!(c.needs_review);
        assert_eq!(c.review_reason.as_deref(), Some("no external record found"));
    }

    #[tokio::test]
    async fn test_name_mismatch_flags_review() {
        let lookup = StaticLookup::new(vec![(
            key("689", "S.W.3d", 331),
            record("Garza v. State"),
        )]);
        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, None);
        resolve_citations(vec![&mut c], &lookup, &EngineConfig::default()).await;
        assert!(c.needs_review);
        assert!(c.external_record.is_some());
    }

    #[tokio::test]
    async fn test_abbreviated_name_still_matches_record() {
        let lookup = StaticLookup::new(vec![(
            key("559", "S.W.3d", 474),
            record("Beham v. State"),
        )]);
        let mut c = full("Roderick Beham v. State", "559", "S.W.3d", 474, None);
        resolve_citations(vec![&mut c], &lookup, &EngineConfig::default()).await;
        assert!(!c.needs_review);
    }

    #[tokio::test]
    async fn test_short_citation_inherits_from_full() {
        let lookup = StaticLookup::new(vec![(
            key("50", "S.W.3d", 90),
            record("Brown v. State"),
        )]);
        let mut a = full("Brown v. State", "50", "S.W.3d", 90, None);
        let mut b = short("Brown", "50", "S.W.3d", "100");
        let diags =
            resolve_citations(vec![&mut a, &mut b], &lookup, &EngineConfig::default()).await;
        assert!(diags.is_empty());
        assert_eq!(b.case_name.as_deref(), Some("Brown v. State"));
        assert_eq!(b.start_page, Some(90));
        assert!(b.external_record.is_some());
        // One key, one request.
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unresolved_short_citation_flags() {
        let mut c = short("Brown", "50", "S.W.3d", "100");
        let diags =
            resolve_citations(vec![&mut c], &NoopLookup, &EngineConfig::default()).await;
        assert_eq!(diags.len(), 1);
        assert!(matches!(
            diags[0],
            Diagnostic::UnresolvedShortCitation { .. }
        ));
        assert!(c.needs_review);
    }

    #[tokio::test]
    async fn test_id_inherits_from_previous_citation() {
        let lookup = StaticLookup::new(vec![(
            key("689", "S.W.3d", 331),
            record("Baltimore v. State"),
        )]);
        let mut a = full("Baltimore v. State", "689", "S.W.3d", 331, None);
        let mut b = id_cite(Some("340"));
        resolve_citations(vec![&mut a, &mut b], &lookup, &EngineConfig::default()).await;
        assert_eq!(b.case_name.as_deref(), Some("Baltimore v. State"));
        assert_eq!(b.start_page, Some(331));
        assert!(b.external_record.is_some());
        assert!(!b.invalid_pinpoint);
    }

    #[tokio::test]
    async fn test_bare_id_inherits_pinpoint() {
        let mut a = full("Baltimore v. State", "689", "S.W.3d", 331, Some("340"));
        let mut b = id_cite(None);
        resolve_citations(vec![&mut a, &mut b], &NoopLookup, &EngineConfig::default()).await;
        assert_eq!(b.pinpoint.as_deref(), Some("340"));

        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, Some("340"));
        let mut d = id_cite(Some("345"));
        resolve_citations(vec![&mut c, &mut d], &NoopLookup, &EngineConfig::default()).await;
        assert_eq!(d.pinpoint.as_deref(), Some("345"));
    }

    #[tokio::test]
    async fn test_id_without_antecedent_flags() {
        let mut c = id_cite(None);
        let diags =
            resolve_citations(vec![&mut c], &NoopLookup, &EngineConfig::default()).await;
        assert_eq!(diags.len(), 1);
        assert!(matches!(diags[0], Diagnostic::UnresolvedId { .. }));
        assert!(c.needs_review);
    }

    #[tokio::test]
    async fn test_pinpoint_outside_window_is_invalid() {
        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, Some("90"));
        let diags =
            resolve_citations(vec![&mut c], &NoopLookup, &EngineConfig::default()).await;
        assert!(c.invalid_pinpoint);
        assert!(diags
            .iter()
            .any(|d| matches!(d, Diagnostic::InvalidPinpoint { .. })));
    }

    #[tokio::test]
    async fn test_pinpoint_range_validates_on_first_page() {
        let mut c = full("Baltimore v. State", "689", "S.W.3d", 331, Some("340-41"));
        resolve_citations(vec![&mut c], &NoopLookup, &EngineConfig::default()).await;
        assert!(!c.invalid_pinpoint);
    }
}
