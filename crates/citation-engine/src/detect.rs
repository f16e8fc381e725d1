//! Per-sentence citation detection.
//!
//! Runs the recognizers over one sentence, resolves overlaps in favor of
//! the most specific form, pulls in introductory signals and trailing
//! parentheticals, and drops anything that matched a pattern but cannot
//! yield a usable citation.

use std::ops::Range;

use brief_types::{Citation, CitationKind, ParenQuote, ParentheticalNote, ResolutionType};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Diagnostic;
use crate::patterns::{
    self, ANNOTATION, CASE_CITATION, COURT_YEAR, ID_CITATION, SHORT_CITATION, STATUTE_CITATION,
};

/// A citation located within one sentence, with the spans the linker
/// needs to carve the sentence into proposition and citation text.
#[derive(Debug, Clone)]
pub struct DetectedCitation {
    pub citation: Citation,
    /// Start of the introductory signal, or of the citation itself when
    /// there is none.
    pub signal_start: usize,
    /// Start of the citation text proper.
    pub start: usize,
    /// End of everything the citation consumed, trailing parentheticals
    /// and annotations included.
    pub end: usize,
}

lazy_static! {
    /// Citation-shaped fragment with a page but no volume/reporter:
    /// `Brown at 100`. These are author mistakes, not short cites.
    static ref BARE_AT: Regex =
        Regex::new(r"\b([A-Z][\w'’\-]*)\s+at\s+\d{1,5}\b").expect("bare-at pattern");
}

/// Capitalized sentence openers that precede "at <page>" in ordinary
/// prose and must not be read as broken citations.
const BARE_AT_STOPLIST: &[&str] = &["The", "A", "An", "In", "On", "At", "It", "No", "Not"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognizer {
    FullCase,
    ShortCase,
    Statute,
    Id,
}

impl Recognizer {
    /// Tie-break when two recognizers claim the same span: the more
    /// specific form wins.
    fn priority(self) -> u8 {
        match self {
            Recognizer::FullCase => 0,
            Recognizer::ShortCase => 1,
            Recognizer::Statute => 2,
            Recognizer::Id => 3,
        }
    }
}

fn base_citation(kind: CitationKind, resolution_type: ResolutionType) -> Citation {
    Citation {
        text: String::new(),
        kind,
        resolution_type,
        volume: None,
        reporter: None,
        start_page: None,
        case_name: None,
        signal: None,
        pinpoint: None,
        parenthetical: None,
        external_record: None,
        needs_review: false,
        review_reason: None,
        invalid_pinpoint: false,
        verification_strategy: None,
    }
}

/// If the recognizer swallowed a leading capitalized signal word into a
/// name capture ("See Baltimore v. State"), return the byte offset where
/// the real name begins.
fn swallowed_signal_offset(name: &str) -> usize {
    let Some(ws) = name.find(char::is_whitespace) else {
        return 0;
    };
    let first = name[..ws].to_lowercase();
    if patterns::SIGNALS.contains(&first.as_str()) {
        let rest = name[ws..].trim_start();
        if !rest.is_empty() {
            return name.len() - rest.len();
        }
    }
    0
}

/// Find a balanced parenthetical starting at (or just after whitespace
/// from) `from`. Returns the full range including parens and the inner
/// content. An unbalanced open paren yields nothing.
fn parenthetical_after(sentence: &str, from: usize) -> Option<(Range<usize>, &str)> {
    let rest = &sentence[from..];
    let open = from + (rest.len() - rest.trim_start().len());
    if !sentence[open..].starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in sentence[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let end = open + i + 1;
                    return Some((open..end, &sentence[open + 1..end - 1]));
                }
            }
            _ => {}
        }
    }
    None
}

fn parenthetical_note(content: &str) -> ParentheticalNote {
    let quotations: Vec<ParenQuote> = patterns::inline_quotes(content)
        .into_iter()
        .map(|(_, text)| ParenQuote { text })
        .collect();
    ParentheticalNote {
        content: content.trim().to_string(),
        has_quotations: !quotations.is_empty(),
        quotations,
    }
}

/// Consume the parenthetical tail after a citation match. Court/year and
/// other formal parentheticals extend the citation text; an explanatory
/// or quoted parenthetical becomes the note; annotations like
/// `(emphasis added)` are consumed without becoming either.
fn consume_tail(
    sentence: &str,
    match_end: usize,
) -> (usize, usize, Option<ParentheticalNote>) {
    let mut text_end = match_end;
    let mut end = match_end;
    let mut note = None;

    while let Some((range, content)) = parenthetical_after(sentence, end) {
        if COURT_YEAR.is_match(content.trim()) {
            end = range.end;
            text_end = range.end;
        } else if ANNOTATION.is_match(&sentence[range.start..]) {
            end = range.end;
        } else if note.is_none() {
            let has_quotes = !patterns::inline_quotes(content).is_empty();
            if patterns::is_explanatory(content) || has_quotes {
                note = Some(parenthetical_note(content));
                end = range.end;
            } else {
                // Formal tail like "(op. on reh'g)" stays citation text.
                end = range.end;
                text_end = range.end;
            }
        } else {
            break;
        }
    }
    (text_end, end, note)
}

struct Candidate<'t> {
    start: usize,
    end: usize,
    recognizer: Recognizer,
    caps: regex::Captures<'t>,
}

fn collect_candidates(sentence: &str) -> Vec<Candidate<'_>> {
    let mut candidates = Vec::new();
    let sources: [(&Regex, Recognizer); 4] = [
        (&*CASE_CITATION, Recognizer::FullCase),
        (&*SHORT_CITATION, Recognizer::ShortCase),
        (&*STATUTE_CITATION, Recognizer::Statute),
        (&*ID_CITATION, Recognizer::Id),
    ];
    for (regex, recognizer) in sources {
        for caps in regex.captures_iter(sentence) {
            if let Some(whole) = caps.get(0) {
                candidates.push(Candidate {
                    start: whole.start(),
                    end: whole.end(),
                    recognizer,
                    caps,
                });
            }
        }
    }
    candidates.sort_by_key(|c| (c.start, c.recognizer.priority()));
    candidates
}

/// Detect every citation in one sentence, in document order. Matches that
/// cannot produce a citation are dropped and reported as diagnostics.
pub fn detect_citations(sentence: &str) -> (Vec<DetectedCitation>, Vec<Diagnostic>) {
    let mut detections: Vec<DetectedCitation> = Vec::new();
    let mut diagnostics = Vec::new();

    let mut claimed_end = 0usize;
    for candidate in collect_candidates(sentence) {
        if candidate.start < claimed_end {
            continue;
        }
        match build_detection(sentence, &candidate) {
            Ok(detection) => {
                claimed_end = detection.end;
                detections.push(detection);
            }
            Err(diag) => {
                tracing::warn!("{}", diag);
                claimed_end = candidate.end;
                diagnostics.push(diag);
            }
        }
    }

    // Flag citation-shaped fragments the recognizers rejected.
    for m in BARE_AT.captures_iter(sentence) {
        let whole = match m.get(0) {
            Some(w) => w,
            None => continue,
        };
        let overlaps = detections
            .iter()
            .any(|d| whole.start() < d.end && d.signal_start < whole.end());
        let word = m.get(1).map(|g| g.as_str()).unwrap_or("");
        if !overlaps && !BARE_AT_STOPLIST.contains(&word) {
            let diag = Diagnostic::MalformedCitation {
                text: whole.as_str().to_string(),
            };
            tracing::warn!("{}", diag);
            diagnostics.push(diag);
        }
    }

    (detections, diagnostics)
}

fn build_detection(
    sentence: &str,
    candidate: &Candidate<'_>,
) -> Result<DetectedCitation, Diagnostic> {
    let caps = &candidate.caps;
    let malformed = || Diagnostic::MalformedCitation {
        text: sentence[candidate.start..candidate.end].to_string(),
    };

    let mut start = candidate.start;
    let mut citation = match candidate.recognizer {
        Recognizer::FullCase => {
            let name = caps.name("name").ok_or_else(malformed)?;
            let offset = swallowed_signal_offset(name.as_str());
            start = name.start() + offset;

            let page: u32 = caps
                .name("page")
                .and_then(|p| p.as_str().parse().ok())
                .ok_or_else(malformed)?;
            let mut cite = base_citation(CitationKind::Case, ResolutionType::Full);
            cite.case_name = Some(name.as_str()[offset..].to_string());
            cite.volume = caps.name("volume").map(|v| v.as_str().to_string());
            cite.reporter = caps.name("reporter").map(|r| r.as_str().to_string());
            cite.start_page = Some(page);
            cite.pinpoint = caps.name("pin").map(|p| p.as_str().to_string());
            cite
        }
        Recognizer::ShortCase => {
            let mut cite = base_citation(CitationKind::Case, ResolutionType::Short);
            cite.case_name = caps.name("name").map(|n| n.as_str().to_string());
            cite.volume = caps.name("volume").map(|v| v.as_str().to_string());
            cite.reporter = caps.name("reporter").map(|r| r.as_str().to_string());
            cite.pinpoint = Some(
                caps.name("pin")
                    .ok_or_else(malformed)?
                    .as_str()
                    .to_string(),
            );
            cite
        }
        Recognizer::Statute => {
            let code = caps.name("code").ok_or_else(malformed)?;
            let offset = swallowed_signal_offset(code.as_str());
            if offset > 0 {
                start = code.start() + offset;
            }
            base_citation(CitationKind::Statute, ResolutionType::Full)
        }
        Recognizer::Id => {
            let mut cite = base_citation(CitationKind::Case, ResolutionType::Id);
            cite.pinpoint = caps.name("pin").map(|p| p.as_str().to_string());
            cite
        }
    };

    let (text_end, end, note) = consume_tail(sentence, candidate.end);
    citation.text = sentence[start..text_end].to_string();
    citation.parenthetical = note;

    let (signal, signal_start) = match patterns::find_signal_before(sentence, start) {
        Some((signal, at)) => (Some(signal), at),
        None => (None, start),
    };
    citation.signal = signal;

    Ok(DetectedCitation {
        citation,
        signal_start,
        start,
        end,
    })
}
