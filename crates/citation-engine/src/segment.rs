//! Paragraph, sentence, and block-quote segmentation.

use crate::config::EngineConfig;
use crate::patterns;
use crate::section::{Line, SectionSpan};

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// One sentence (or whole block quote) ready for citation detection.
#[derive(Debug, Clone)]
pub struct SentenceRecord {
    pub text: String,
    pub is_block_quote: bool,
    pub start_page: u32,
    pub end_page: u32,
}

lazy_static! {
    // En-dash inside a number range stays a plain hyphen so pin cites
    // like "91-92" keep matching.
    static ref NUMERIC_EN_DASH: Regex =
        Regex::new(r"(\d)\u{2013}(\d)").expect("numeric en-dash pattern");
    static ref DASH: Regex = Regex::new("[\u{2014}\u{2013}]").expect("dash pattern");
    static ref HYPHEN_BREAK: Regex =
        Regex::new(r"(\w)-\s+(\p{Ll})").expect("hyphen break pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
}

/// Canonicalize typographic artifacts that would break citation patterns:
/// em/en dashes become a spaced double hyphen, words hyphenated across a
/// line break are rejoined, and whitespace collapses.
pub fn normalize_text(text: &str) -> String {
    let text = NUMERIC_EN_DASH.replace_all(text, "$1-$2");
    let text = DASH.replace_all(&text, " -- ");
    let text = HYPHEN_BREAK.replace_all(&text, "$1$2");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Most common rounded indent among substantial lines: the body margin.
fn body_margin(lines: &[Line]) -> f32 {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for line in lines {
        if line.text.trim().len() > 30 {
            *counts.entry(line.indent.round() as i32).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(indent, count)| (count, std::cmp::Reverse(indent)))
        .map(|(indent, _)| indent as f32)
        .unwrap_or(0.0)
}

struct Paragraph<'a> {
    lines: Vec<&'a Line>,
}

impl Paragraph<'_> {
    fn is_block_quote(&self, margin: f32, threshold: f32) -> bool {
        // A block quote is two or more consecutive lines ALL indented
        // beyond the body margin; a single indented line is just a
        // first-line paragraph indent.
        self.lines.len() >= 2 && self.lines.iter().all(|l| l.indent - margin > threshold)
    }

    fn text(&self) -> String {
        let joined = self
            .lines
            .iter()
            .map(|l| l.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        normalize_text(&joined)
    }

    fn pages(&self) -> (u32, u32) {
        let first = self.lines.first().map(|l| l.page).unwrap_or(0);
        let last = self.lines.last().map(|l| l.page).unwrap_or(first);
        (first, last)
    }
}

fn paragraphs(span: &SectionSpan) -> Vec<Paragraph<'_>> {
    let mut out = Vec::new();
    let mut current: Vec<&Line> = Vec::new();
    for line in &span.lines {
        if line.text.trim().is_empty() {
            if !current.is_empty() {
                out.push(Paragraph {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(Paragraph { lines: current });
    }
    out
}

/// Split paragraph text into sentences, guarding against legal
/// abbreviations ("Tex.", "S.W.3d", "v.") being misread as sentence ends.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if c == '.' || c == '!' || c == '?' {
            // A closing quote right after the period belongs to this
            // sentence: `...sufficient." Baltimore v. State...`
            let mut end_idx = i;
            if let Some(&(_, next)) = chars.get(i + 1) {
                if matches!(next, '"' | '\u{201d}' | '\'' | '\u{2019}') {
                    end_idx = i + 1;
                }
            }

            let rest_start = chars
                .get(end_idx + 1)
                .map(|&(p, _)| p)
                .unwrap_or(text.len());
            let rest = text[rest_start..].trim_start();

            let looks_terminal = rest.is_empty()
                || rest.chars().next().is_some_and(|r| {
                    r.is_uppercase() || matches!(r, '"' | '\u{201c}' | '\u{2018}')
                });
            let is_abbrev = c == '.' && patterns::is_abbreviation(text, pos);

            if looks_terminal && !is_abbrev {
                let end_pos = chars
                    .get(end_idx + 1)
                    .map(|&(p, _)| p)
                    .unwrap_or(text.len());
                let sentence = text[start..end_pos].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = end_pos;
            }
            i = end_idx + 1;
        } else {
            i += 1;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Segment the section into ordered sentence records. Block-quote
/// paragraphs stay whole; body paragraphs split into sentences.
pub fn segment_section(span: &SectionSpan, config: &EngineConfig) -> Vec<SentenceRecord> {
    let margin = body_margin(&span.lines);
    let mut records = Vec::new();

    for para in paragraphs(span) {
        let (start_page, end_page) = para.pages();
        if para.is_block_quote(margin, config.block_quote_indent) {
            let text = para.text();
            if !text.is_empty() {
                records.push(SentenceRecord {
                    text,
                    is_block_quote: true,
                    start_page,
                    end_page,
                });
            }
        } else {
            for sentence in split_sentences(&para.text()) {
                records.push(SentenceRecord {
                    text: sentence,
                    is_block_quote: false,
                    start_page,
                    end_page,
                });
            }
        }
    }
    records
}
