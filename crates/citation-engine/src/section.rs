//! Argument-section boundary detection.

use brief_types::PageText;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// One line of section text with its page attribution and left indent.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub page: u32,
    pub indent: f32,
}

/// The bounded argument span: everything between the start heading and
/// the end heading, exclusive of the heading lines themselves.
#[derive(Debug, Clone)]
pub struct SectionSpan {
    pub start_page: u32,
    pub end_page: u32,
    pub lines: Vec<Line>,
}

/// Whether a line is the given heading, exactly or as a prefix form
/// ("Argument on sole ground:").
pub(crate) fn matches_heading(line: &str, heading: &str) -> bool {
    let trimmed = line.trim();
    // Headings are ASCII; a line whose byte at heading.len() sits inside
    // a multi-byte character cannot start with one.
    if trimmed.len() < heading.len() || !trimmed.is_char_boundary(heading.len()) {
        return false;
    }
    if !trimmed[..heading.len()].eq_ignore_ascii_case(heading) {
        return false;
    }
    // Exact match, or the heading is a whole-word prefix of a longer
    // heading line.
    trimmed[heading.len()..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric())
}

pub(crate) fn matches_any(line: &str, headings: &[String]) -> bool {
    headings.iter().any(|h| matches_heading(line, h))
}

/// Locate the argument section across the ordered pages. Both headings
/// must be present; a missing heading is terminal for the document.
pub fn extract_section(
    pages: &[PageText],
    config: &EngineConfig,
) -> Result<SectionSpan, EngineError> {
    let mut lines = Vec::new();
    let mut start_page = None;
    let mut end_page = None;

    'pages: for page in pages {
        for (i, raw_line) in page.text.lines().enumerate() {
            if start_page.is_none() {
                if matches_any(raw_line, &config.start_headings) {
                    start_page = Some(page.page_number);
                }
                continue;
            }
            if matches_any(raw_line, &config.end_headings) {
                end_page = Some(page.page_number);
                break 'pages;
            }
            let indent = page.line_indents.get(i).copied().unwrap_or(0.0);
            lines.push(Line {
                text: raw_line.to_string(),
                page: page.page_number,
                indent,
            });
        }
    }

    let start_page = start_page.ok_or_else(|| {
        EngineError::SectionNotFound(
            config
                .start_headings
                .first()
                .cloned()
                .unwrap_or_else(|| "Argument".to_string()),
        )
    })?;
    let end_page = end_page.ok_or_else(|| {
        EngineError::SectionNotFound(
            config
                .end_headings
                .first()
                .cloned()
                .unwrap_or_else(|| "Prayer".to_string()),
        )
    })?;

    Ok(SectionSpan {
        start_page,
        end_page,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, text: &str) -> PageText {
        PageText {
            page_number: n,
            text: text.to_string(),
            line_indents: vec![],
        }
    }

    #[test]
    fn test_finds_section_across_pages() {
        let pages = vec![
            page(1, "Statement of Facts\nThe facts are these.\n"),
            page(2, "Argument\nThe evidence was insufficient.\nMore argument."),
            page(3, "Final argument line.\nPrayer\nWherefore, premises considered."),
        ];
        let span = extract_section(&pages, &EngineConfig::default()).unwrap();
        assert_eq!(span.start_page, 2);
        assert_eq!(span.end_page, 3);
        let texts: Vec<&str> = span.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "The evidence was insufficient.",
                "More argument.",
                "Final argument line."
            ]
        );
        assert_eq!(span.lines[0].page, 2);
        assert_eq!(span.lines[2].page, 3);
    }

    #[test]
    fn test_accepts_prefix_heading() {
        let pages = vec![
            page(1, "Argument on sole ground: sufficiency\nBody text.\nConclusion\n"),
        ];
        let span = extract_section(&pages, &EngineConfig::default()).unwrap();
        assert_eq!(span.start_page, 1);
        assert_eq!(span.lines.len(), 1);
    }

    #[test]
    fn test_heading_matching_is_case_insensitive() {
        let pages = vec![page(1, "ARGUMENT\nBody.\nPRAYER\n")];
        let span = extract_section(&pages, &EngineConfig::default()).unwrap();
        assert_eq!(span.lines[0].text, "Body.");
    }

    #[test]
    fn test_word_starting_with_heading_does_not_match() {
        // "Argumentative" is not the "Argument" heading.
        let pages = vec![page(1, "Argumentative\nBody.\nPrayer\n")];
        let err = extract_section(&pages, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::SectionNotFound(_)));
    }

    #[test]
    fn test_multibyte_text_is_not_mistaken_for_heading() {
        let pages = vec![page(
            1,
            "Argument\n\
             Brief\u{2014}in support of the motion.\n\
             \u{201c}Prayer\u{201d} is what the brief asks for.\n\
             Prayer\n",
        )];
        let span = extract_section(&pages, &EngineConfig::default()).unwrap();
        let texts: Vec<&str> = span.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Brief\u{2014}in support of the motion.",
                "\u{201c}Prayer\u{201d} is what the brief asks for."
            ]
        );
    }

    #[test]
    fn test_missing_start_heading_is_terminal() {
        let pages = vec![page(1, "Statement of Facts\nPrayer\n")];
        let err = extract_section(&pages, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::SectionNotFound(_)));
    }

    #[test]
    fn test_missing_end_heading_is_terminal() {
        let pages = vec![page(1, "Argument\nBody with no closing heading.\n")];
        let err = extract_section(&pages, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::SectionNotFound(_)));
    }

    #[test]
    fn test_line_indents_carried_through() {
        let pages = vec![PageText {
            page_number: 4,
            text: "Argument\nBody line.\nIndented line.\nPrayer".to_string(),
            line_indents: vec![72.0, 72.0, 108.0, 72.0],
        }];
        let span = extract_section(&pages, &EngineConfig::default()).unwrap();
        assert_eq!(span.lines[0].indent, 72.0);
        assert_eq!(span.lines[1].indent, 108.0);
    }
}
