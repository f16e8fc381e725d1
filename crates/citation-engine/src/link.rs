//! Linking citations to the argument text they support.
//!
//! Each sentence containing citations becomes one item. A signaled
//! citation carrying an explanatory parenthetical takes the parenthetical
//! content as its proposition. Otherwise the proposition is the sentence
//! with the citation spans carved out; when nothing substantial remains,
//! the linker falls back to the preceding uncited sentence or block
//! quote, then to a parenthetical, then to the sentence as a whole.

use brief_types::{Item, ItemType, Quotation, QuoteSource};

use crate::detect::{self, DetectedCitation};
use crate::error::Diagnostic;
use crate::patterns::{self, ANNOTATION};
use crate::segment::SentenceRecord;

/// Minimum cleaned length before carved-out sentence text counts as a
/// proposition on its own.
const MIN_PROPOSITION_LEN: usize = 20;

/// Minimum alphanumeric content before unquoted text counts as a
/// statement alongside quotations.
const MIN_STATEMENT_CHARS: usize = 10;

/// Connectors that survive citation carving as orphans ("X, and Y"
/// with the citations removed) and carry no propositional content.
const CONNECTORS: &[&str] = &["and", "or", "with"];

/// The most recent uncited unit, claimable by the next cited sentence.
struct Context {
    text: String,
    is_block_quote: bool,
}

fn strip_annotations(piece: &str) -> &str {
    let mut piece = piece;
    while let Some(m) = ANNOTATION.find(piece) {
        piece = &piece[m.end()..];
    }
    piece
}

fn clean_piece(piece: &str) -> &str {
    strip_annotations(piece.trim_start_matches([',', ';', '.', ':', ' ']).trim()).trim()
}

/// Join the text fragments left after removing citation spans. A dash
/// pair flanking a removed citation collapses so the surrounding clause
/// reads through.
fn join_pieces<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut joined = String::new();
    for piece in pieces {
        let mut piece = clean_piece(piece);
        if piece.is_empty() || CONNECTORS.contains(&piece.to_lowercase().as_str()) {
            continue;
        }
        if joined.ends_with("--") && piece.starts_with("--") {
            joined.truncate(joined.len() - 2);
            joined.truncate(joined.trim_end().len());
            piece = piece[2..].trim_start();
            if piece.is_empty() {
                continue;
            }
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(piece);
    }
    trim_trailing_connector(joined)
}

fn trim_trailing_connector(mut joined: String) -> String {
    joined.truncate(joined.trim_end_matches([',', ';', ' ']).len());
    for connector in CONNECTORS {
        let suffix = format!(" {}", connector);
        if joined.to_lowercase().ends_with(&suffix) {
            joined.truncate(joined.len() - suffix.len());
            joined.truncate(joined.trim_end_matches([',', ';', ' ']).len());
            break;
        }
    }
    joined
}

/// Sentence text with every citation span removed.
fn carve_proposition(sentence: &str, detections: &[DetectedCitation]) -> String {
    let mut pieces = Vec::new();
    let mut cursor = 0usize;
    for d in detections {
        if d.signal_start > cursor {
            pieces.push(&sentence[cursor..d.signal_start]);
        }
        cursor = cursor.max(d.end);
    }
    if cursor < sentence.len() {
        pieces.push(&sentence[cursor..]);
    }
    join_pieces(pieces.into_iter())
}

fn substantial(text: &str) -> bool {
    text.chars().filter(|c| c.is_alphanumeric()).count() >= MIN_STATEMENT_CHARS
}

fn inline_quotations(text: &str) -> (Vec<Quotation>, String) {
    let quotes = patterns::inline_quotes(text);
    if quotes.is_empty() {
        return (Vec::new(), text.to_string());
    }
    let mut unquoted = String::new();
    let mut cursor = 0usize;
    for (range, _) in &quotes {
        unquoted.push_str(&text[cursor..range.start]);
        cursor = range.end;
    }
    unquoted.push_str(&text[cursor..]);
    let unquoted = unquoted.split_whitespace().collect::<Vec<_>>().join(" ");
    let quotations = quotes
        .into_iter()
        .map(|(_, text)| Quotation {
            text,
            source: QuoteSource::Inline,
        })
        .collect();
    (quotations, unquoted.trim_matches([',', ';', '.', ':', ' ']).to_string())
}

fn classify(quotations: &[Quotation], unquoted: &str) -> ItemType {
    if quotations.is_empty() {
        ItemType::Statement
    } else if substantial(unquoted) {
        ItemType::Mixed
    } else {
        ItemType::Quotation
    }
}

fn build_item(
    record: &SentenceRecord,
    detections: Vec<DetectedCitation>,
    prev: &mut Option<Context>,
) -> Item {
    let carved = carve_proposition(&record.text, &detections);

    let signaled_paren = detections
        .iter()
        .find(|d| d.citation.signal.is_some() && d.citation.parenthetical.is_some())
        .and_then(|d| d.citation.parenthetical.as_ref())
        .map(|note| note.content.clone());

    let (text, quotations, unquoted) = if let Some(content) = signaled_paren {
        // A signaled citation's parenthetical carries the supported
        // proposition; its quotations stay on the citation side.
        let unquoted = content.clone();
        (content, Vec::new(), unquoted)
    } else if carved.len() >= MIN_PROPOSITION_LEN {
        let (quotations, unquoted) = inline_quotations(&carved);
        (carved, quotations, unquoted)
    } else if let Some(context) = prev.take() {
        if context.is_block_quote {
            let quote = Quotation {
                text: context.text.clone(),
                source: QuoteSource::Block,
            };
            (context.text, vec![quote], String::new())
        } else {
            let (quotations, unquoted) = inline_quotations(&context.text);
            (context.text, quotations, unquoted)
        }
    } else if let Some(content) = detections
        .iter()
        .find_map(|d| d.citation.parenthetical.as_ref())
        .map(|note| note.content.clone())
    {
        // Parenthetical content stands in for the missing statement; its
        // quotations stay on the citation side.
        let unquoted = content.clone();
        (content, Vec::new(), unquoted)
    } else {
        (record.text.clone(), Vec::new(), record.text.clone())
    };

    let item_type = classify(&quotations, &unquoted);
    let citations = detections.into_iter().map(|d| d.citation).collect();

    Item {
        text,
        item_type,
        unquoted_text: unquoted,
        quotations,
        citations,
    }
}

/// Walk the sentence records in order, attaching citations to the
/// propositions they support.
pub fn link_items(records: &[SentenceRecord]) -> (Vec<Item>, Vec<Diagnostic>) {
    let mut items = Vec::new();
    let mut diagnostics = Vec::new();
    let mut prev: Option<Context> = None;

    for record in records {
        let (detections, mut diags) = detect::detect_citations(&record.text);
        diagnostics.append(&mut diags);

        if detections.is_empty() {
            prev = Some(Context {
                text: record.text.clone(),
                is_block_quote: record.is_block_quote,
            });
            continue;
        }

        items.push(build_item(record, detections, &mut prev));
        // A cited sentence ends the claimable window either way.
        prev = None;
    }

    (items, diagnostics)
}
