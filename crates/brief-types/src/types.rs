//! Shared data model for brief analysis.
//!
//! These types are the wire format between the citation engine, the API
//! layer, and downstream annotation tools, so every field that appears in
//! the output JSON lives here.

use serde::{Deserialize, Serialize};

/// One page of extracted brief text, as supplied by the PDF-extraction
/// collaborator. The engine never touches PDF binary structure itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_number: u32,
    pub text: String,
    /// Left indent in points for each line of `text`, parallel to the
    /// line split of `text`. Missing entries are treated as flush left.
    #[serde(default)]
    pub line_indents: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    Case,
    Statute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    Full,
    Short,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Statement,
    Quotation,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Inline,
    Block,
}

/// How a citation should later be checked against the cited case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStrategy {
    /// Exact text search for the quoted span(s).
    Direct,
    /// Semantic comparison of the statement text.
    Semantic,
    /// Direct search for every quotation plus one semantic search.
    Both,
}

/// A quoted span supporting a citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub text: String,
    pub source: QuoteSource,
}

/// A quoted span inside a parenthetical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenQuote {
    pub text: String,
}

/// Explanatory parenthetical following a citation, e.g.
/// `(holding that "a mere modicum" is insufficient)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentheticalNote {
    pub content: String,
    pub has_quotations: bool,
    pub quotations: Vec<ParenQuote>,
}

/// External case record returned by the case-law lookup collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_name: String,
    pub court: String,
    pub date_filed: String,
    pub absolute_url: String,
    pub parallel_citations: Vec<String>,
}

/// One recognized citation occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Exact matched substring from the brief.
    pub text: String,
    pub kind: CitationKind,
    pub resolution_type: ResolutionType,
    /// Identifying key for case citations. Absent for statutes, and for
    /// id. citations until the resolver fills them in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    pub signal: Option<String>,
    pub pinpoint: Option<String>,
    pub parenthetical: Option<ParentheticalNote>,
    pub external_record: Option<CaseRecord>,
    pub needs_review: bool,
    /// Why `needs_review` was set, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
    pub invalid_pinpoint: bool,
    pub verification_strategy: Option<VerificationStrategy>,
}

impl Citation {
    /// Mark the citation for manual review, keeping the first reason.
    pub fn flag_for_review(&mut self, reason: &str) {
        self.needs_review = true;
        if self.review_reason.is_none() {
            self.review_reason = Some(reason.to_string());
        }
    }
}

/// One unit of argument text and the citations offered to support it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Statement portion with quoted spans removed. Empty for pure
    /// quotations.
    pub unquoted_text: String,
    pub quotations: Vec<Quotation>,
    /// Insertion order is document order.
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMetadata {
    pub start_page: u32,
    pub end_page: u32,
    pub total_statements: usize,
    pub total_quotations: usize,
    pub total_citations: usize,
}

/// The bounded argument span. Built once per document run; not mutated
/// after the pipeline completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub metadata: SectionMetadata,
    pub items: Vec<Item>,
}

impl Section {
    /// Assemble a section, deriving the counts from the items.
    pub fn new(start_page: u32, end_page: u32, items: Vec<Item>) -> Self {
        let total_statements = items
            .iter()
            .filter(|i| matches!(i.item_type, ItemType::Statement | ItemType::Mixed))
            .count();
        let total_quotations = items
            .iter()
            .filter(|i| matches!(i.item_type, ItemType::Quotation | ItemType::Mixed))
            .count();
        let total_citations = items.iter().map(|i| i.citations.len()).sum();

        Self {
            metadata: SectionMetadata {
                start_page,
                end_page,
                total_statements,
                total_quotations,
                total_citations,
            },
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn citation() -> Citation {
        Citation {
            text: "Smith v. State, 123 S.W.3d 456".to_string(),
            kind: CitationKind::Case,
            resolution_type: ResolutionType::Full,
            volume: Some("123".to_string()),
            reporter: Some("S.W.3d".to_string()),
            start_page: Some(456),
            case_name: Some("Smith v. State".to_string()),
            signal: None,
            pinpoint: None,
            parenthetical: None,
            external_record: None,
            needs_review: false,
            review_reason: None,
            invalid_pinpoint: false,
            verification_strategy: Some(VerificationStrategy::Semantic),
        }
    }

    #[test]
    fn test_item_type_serializes_lowercase() {
        let json = serde_json::to_string(&ItemType::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
        let json = serde_json::to_string(&ResolutionType::Id).unwrap();
        assert_eq!(json, "\"id\"");
        let json = serde_json::to_string(&VerificationStrategy::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }

    #[test]
    fn test_item_type_field_renamed() {
        let item = Item {
            text: "The court erred.".to_string(),
            item_type: ItemType::Statement,
            unquoted_text: "The court erred.".to_string(),
            quotations: vec![],
            citations: vec![citation()],
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "statement");
        assert_eq!(value["citations"][0]["resolution_type"], "full");
    }

    #[test]
    fn test_section_counts_derived() {
        let statement = Item {
            text: "A".to_string(),
            item_type: ItemType::Statement,
            unquoted_text: "A".to_string(),
            quotations: vec![],
            citations: vec![citation()],
        };
        let mixed = Item {
            text: "B \"q\"".to_string(),
            item_type: ItemType::Mixed,
            unquoted_text: "B".to_string(),
            quotations: vec![Quotation {
                text: "q".to_string(),
                source: QuoteSource::Inline,
            }],
            citations: vec![citation(), citation()],
        };
        let section = Section::new(3, 7, vec![statement, mixed]);
        assert_eq!(section.metadata.start_page, 3);
        assert_eq!(section.metadata.end_page, 7);
        assert_eq!(section.metadata.total_statements, 2);
        assert_eq!(section.metadata.total_quotations, 1);
        assert_eq!(section.metadata.total_citations, 3);
    }

    #[test]
    fn test_flag_for_review_keeps_first_reason() {
        let mut cite = citation();
        cite.flag_for_review("unresolved short citation");
        cite.flag_for_review("missing parenthetical on signaled citation");
        assert!(cite.needs_review);
        assert_eq!(
            cite.review_reason.as_deref(),
            Some("unresolved short citation")
        );
    }
}
