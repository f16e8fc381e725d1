//! Regex patterns and token vocabularies for citation recognition.
//!
//! All patterns are compiled once. The case-name sub-patterns only accept
//! capitalized party words (plus "of"/"the"/"In re") so that ordinary
//! sentence text before a citation is not swallowed into the name.

use lazy_static::lazy_static;
use regex::Regex;

/// Introductory signals, longest first so multi-word signals win.
/// Stored without trailing commas; lookback strips them before matching.
pub const SIGNALS: &[&str] = &[
    "see generally",
    "see, e.g.",
    "see also",
    "but see",
    "but cf.",
    "compare",
    "contra",
    "accord",
    "citing",
    "e.g.",
    "cf.",
    "see",
];

/// Verbs that open an explanatory parenthetical.
pub const PAREN_VERBS: &[&str] = &[
    "holding",
    "stating",
    "finding",
    "noting",
    "explaining",
    "observing",
    "concluding",
    "reasoning",
    "emphasizing",
    "recognizing",
    "determining",
    "clarifying",
    "reaffirming",
    "affirming",
    "reversing",
    "quoting",
    "citing",
    "discussing",
    "describing",
    "providing",
    "defining",
];

/// Legal abbreviations that do not end a sentence, lowercased.
pub const LEGAL_ABBREVS: &[&str] = &[
    "v.", "vs.", "inc.", "ltd.", "corp.", "co.", "no.", "nos.", "app.", "crim.", "civ.", "ct.",
    "dist.", "supp.", "rev.", "stat.", "ann.", "gen.", "ch.", "cl.", "div.", "ed.", "ex.", "fed.",
    "gov.", "jr.", "sr.", "mr.", "mrs.", "ms.", "dr.", "prof.", "rep.", "sen.", "st.", "tex.",
    "cal.", "n.y.", "fla.", "u.s.", "s.w.", "n.w.", "s.e.", "n.e.", "so.", "f.", "l.", "r.", "s.",
    "w.", "p.", "proc.", "evid.", "art.", "n.", "id.", "e.g.", "cf.", "i.e.", "et.", "al.", "cir.",
    "pet.", "op.", "cert.", "reh.", "aff.", "mem.", "s.w.2d", "s.w.3d", "n.w.2d", "n.e.2d",
    "s.e.2d", "so.2d", "so.3d", "f.2d", "f.3d", "f.4th", "l.ed.", "l.ed.2d", "s.ct.",
];

lazy_static! {
    /// Full case citation:
    /// `<party> v. <party>, <volume> <reporter> <page>[, <pinpoint>]`
    /// plus the `In re <party>` form. The reporter is one or more
    /// dot-abbreviation tokens ("S.W.3d", "F. Supp. 2d").
    pub static ref CASE_CITATION: Regex = Regex::new(
        r"(?x)
        (?P<name>
            In\s+re\s+[A-Z][\w'’.\-]*(?:\s+[A-Z][\w'’.\-]*){0,4}?
          | [A-Z][\w'’.\-]*(?:\s+(?:of|the|[A-Z][\w'’.\-]*)){0,6}?
            \s+v\.\s+
            [A-Z][\w'’.\-]*(?:\s+(?:of|the|[A-Z][\w'’.\-]*)){0,6}?
        )
        ,\s*
        (?P<volume>\d{1,4})
        \s+
        (?P<reporter>[A-Z][A-Za-z0-9.]*(?:\s+[A-Za-z0-9.]+)*?)
        \s+
        (?P<page>\d{1,5})\b
        (?:\s*,\s*(?P<pin>\d{1,5}(?:[\u{2013}-]\d{1,5})?)\b)?
        "
    )
    .expect("case citation pattern");

    /// Short-form case citation: `Brown, 50 S.W.3d at 100`.
    pub static ref SHORT_CITATION: Regex = Regex::new(
        r"(?x)
        (?P<name>[A-Z][\w'’\-]*)
        ,\s*
        (?P<volume>\d{1,4})
        \s+
        (?P<reporter>[A-Z][A-Za-z0-9.]*(?:\s+[A-Za-z0-9.]+)*?)
        \s+at\s+
        (?P<pin>\d{1,5}(?:[\u{2013}-]\d{1,5})?)\b
        "
    )
    .expect("short citation pattern");

    /// `Id.` back-reference, optionally with a pin cite.
    pub static ref ID_CITATION: Regex = Regex::new(
        r"\b(?i:id)\.(?:\s+at\s+(?P<pin>\d{1,5}(?:[\u{2013}-]\d{1,5})?))?"
    )
    .expect("id citation pattern");

    /// Statute citation: `[<title>] <code> § <section>[(sub)...]`,
    /// e.g. `Tex. Penal Code § 19.02(b)(1)` or `42 U.S.C. § 1983`.
    pub static ref STATUTE_CITATION: Regex = Regex::new(
        r"(?x)
        (?:(?P<title>\d{1,3})\s+)?
        (?P<code>[A-Z][\w.]*(?:\s+[A-Z&][\w.]*){0,5}?)
        \s*§§?\s*
        (?P<section>\d+[\w.\-]*(?:\([\w.]+\))*)
        "
    )
    .expect("statute citation pattern");

    /// Inline quotation, straight or curly double quotes. Single curly
    /// quotes are left alone; briefs use them for nested quotes.
    pub static ref INLINE_QUOTE: Regex =
        Regex::new("[\"\u{201c}\u{201d}]([^\"\u{201c}\u{201d}]+)[\"\u{201c}\u{201d}]")
            .expect("inline quote pattern");

    /// Citation annotations that are not propositions:
    /// `(emphasis added)`, `(cleaned up)`, `(internal citations omitted)`.
    pub static ref ANNOTATION: Regex = Regex::new(
        r"(?i)^\([^)]*(?:added|omitted|altered|supplied|cleaned\s+up|quotation\s+marks?|citations?|internal|emphasis|footnote)[^)]*\)\s*\.?\s*"
    )
    .expect("annotation pattern");

    /// Court/year parenthetical content such as `Tex. 2020` or
    /// `5th Cir. 1998`: part of the citation, not an explanation.
    pub static ref COURT_YEAR: Regex =
        Regex::new(r"^(?:[\w.']+\s+)*(?:17|18|19|20)\d{2}$").expect("court-year pattern");
}

/// Find an introductory signal whose last word ends immediately before
/// `pos` (allowing trailing spaces/commas). Returns the signal in
/// canonical lowercase form and the byte offset where it starts.
pub fn find_signal_before(text: &str, pos: usize) -> Option<(String, usize)> {
    let preceding = text[..pos].trim_end_matches([' ', ',']);
    let lower = preceding.to_lowercase();
    for signal in SIGNALS {
        if lower.ends_with(signal) {
            let start = preceding.len() - signal.len();
            // Signal must begin a word, not end one ("foresee" is not "see").
            let ok = start == 0
                || preceding[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| !c.is_alphanumeric());
            if ok {
                return Some((signal.to_string(), start));
            }
        }
    }
    None
}

/// Whether the sentence-terminal candidate at `period_pos` (byte index of
/// a `.`) is actually part of a legal abbreviation.
pub fn is_abbreviation(text: &str, period_pos: usize) -> bool {
    let mut start = period_pos;
    let bytes = text.as_bytes();
    while start > 0 {
        let c = bytes[start - 1] as char;
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            start -= 1;
        } else {
            break;
        }
    }
    let word = text[start..=period_pos].to_lowercase();

    if LEGAL_ABBREVS.contains(&word.as_str()) {
        return true;
    }
    // Single letter + period ("U.", "J.") is always an abbreviation.
    if word.len() == 2 && word.as_bytes()[0].is_ascii_alphabetic() {
        return true;
    }
    // Ordinal reporter suffixes like "2d." / "4th.", but not a bare page
    // number ending a sentence ("331.").
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return word.chars().any(|c| c.is_ascii_alphabetic());
    }
    false
}

/// Extract inline quotations with their byte ranges.
pub fn inline_quotes(text: &str) -> Vec<(std::ops::Range<usize>, String)> {
    INLINE_QUOTE
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("match");
            let inner = caps.get(1).expect("group");
            (whole.start()..whole.end(), inner.as_str().to_string())
        })
        .collect()
}

/// Whether parenthetical content opens with an explanatory verb.
pub fn is_explanatory(content: &str) -> bool {
    let lower = content.trim_start().to_lowercase();
    PAREN_VERBS.iter().any(|verb| lower.starts_with(verb))
}
