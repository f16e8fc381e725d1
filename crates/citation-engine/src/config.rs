//! Engine configuration.

/// Tunables for one analysis run. `Default` matches the headings and
/// bounds observed in Texas appellate briefs; all of them can be
/// overridden per deployment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Headings that open the argument section. Matched exactly or as a
    /// prefix of a longer heading line ("Argument on sole ground:").
    pub start_headings: Vec<String>,
    /// Headings that close the argument section.
    pub end_headings: Vec<String>,
    /// Headings that open the table of authorities.
    pub toa_headings: Vec<String>,
    /// Subsection or section headings that close the table's cases
    /// listing.
    pub toa_end_headings: Vec<String>,
    /// A pinpoint is accepted when it falls within
    /// `[start_page, start_page + pinpoint_window]`. The window is a
    /// heuristic, not a property of any reporter, so it stays
    /// configurable.
    pub pinpoint_window: u32,
    /// Points beyond the body margin before a line counts as indented.
    pub block_quote_indent: f32,
    /// Bound on concurrent external lookups during prefetch.
    pub lookup_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_headings: vec!["Argument".to_string(), "Reply Argument".to_string()],
            end_headings: vec!["Prayer".to_string(), "Conclusion".to_string()],
            toa_headings: vec![
                "Index of Authorities".to_string(),
                "Table of Authorities".to_string(),
            ],
            toa_end_headings: vec![
                "Statutes".to_string(),
                "Rules".to_string(),
                "Other".to_string(),
                "Statement".to_string(),
                "Argument".to_string(),
                "Reply".to_string(),
            ],
            pinpoint_window: 500,
            block_quote_indent: 25.0,
            lookup_concurrency: 4,
        }
    }
}
