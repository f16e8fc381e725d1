//! Property-based tests for briefcheck-api
//!
//! Exercises the analysis pipeline and the wire model with generated
//! brief-shaped inputs.

use brief_types::PageText;
use citation_engine::{BriefAnalyzer, NoopLookup};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

/// A capitalized party name that cannot collide with an introductory
/// signal word.
fn party() -> impl Strategy<Value = String> {
    "[A-Z][a-df-z]{2,8}"
}

/// One argument paragraph: a statement sentence followed by a citation
/// sentence.
fn cited_paragraph() -> impl Strategy<Value = String> {
    (party(), party(), 1u32..1000, 1u32..5000).prop_map(|(p, d, volume, page)| {
        format!(
            "The trial court committed reversible error on this record. \
             {} v. {}, {} S.W.3d {}.",
            p, d, volume, page,
        )
    })
}

fn brief_pages(paragraphs: Vec<String>) -> Vec<PageText> {
    let body = paragraphs.join("\n\n");
    vec![PageText {
        page_number: 2,
        text: format!("Argument\n\n{}\n\nPrayer\n", body),
        line_indents: vec![],
    }]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_generated_citation_is_found(paragraphs in prop::collection::vec(cited_paragraph(), 1..6)) {
        let pages = brief_pages(paragraphs.clone());
        let analysis = block_on(
            BriefAnalyzer::default().analyze(&pages, &NoopLookup)
        ).unwrap();
        prop_assert_eq!(analysis.section.metadata.total_citations, paragraphs.len());
        prop_assert_eq!(analysis.section.items.len(), paragraphs.len());
    }

    #[test]
    fn item_types_serialize_to_known_values(paragraphs in prop::collection::vec(cited_paragraph(), 1..4)) {
        let pages = brief_pages(paragraphs);
        let analysis = block_on(
            BriefAnalyzer::default().analyze(&pages, &NoopLookup)
        ).unwrap();
        let value = serde_json::to_value(&analysis.section).unwrap();
        for item in value["items"].as_array().unwrap() {
            let item_type = item["type"].as_str().unwrap();
            prop_assert!(matches!(item_type, "statement" | "quotation" | "mixed"));
            for citation in item["citations"].as_array().unwrap() {
                let strategy = citation["verification_strategy"].as_str().unwrap();
                prop_assert!(matches!(strategy, "direct" | "semantic" | "both"));
            }
        }
    }

    #[test]
    fn page_text_accepts_missing_indents(page_number in 1u32..500, text in "[ -~]{0,200}") {
        let raw = serde_json::json!({ "page_number": page_number, "text": text });
        let parsed: PageText = serde_json::from_value(raw).unwrap();
        prop_assert_eq!(parsed.page_number, page_number);
        prop_assert!(parsed.line_indents.is_empty());
    }
}
