//! Verification-strategy assignment.
//!
//! Decides, per citation, how a downstream checker should test the
//! citation against the cited source: exact text search for quotations,
//! semantic comparison for paraphrased statements, or both.

use brief_types::{Citation, Item, ItemType, VerificationStrategy};

fn strategy_for(item_type: ItemType, citation: &Citation) -> VerificationStrategy {
    // An item mixing quotation and statement always needs both checks,
    // whatever the citation form looks like.
    if item_type == ItemType::Mixed {
        return VerificationStrategy::Both;
    }
    if citation.signal.is_some() {
        // A signaled citation is verified through its parenthetical: a
        // quoted parenthetical can be searched directly, anything else
        // falls back to semantic comparison.
        return match &citation.parenthetical {
            Some(note) if note.has_quotations => VerificationStrategy::Direct,
            _ => VerificationStrategy::Semantic,
        };
    }
    match item_type {
        ItemType::Quotation => VerificationStrategy::Direct,
        ItemType::Statement => VerificationStrategy::Semantic,
        ItemType::Mixed => VerificationStrategy::Both,
    }
}

/// Assign a verification strategy to every citation. Signaled citations
/// without a parenthetical are additionally flagged: Bluebook expects
/// one, and without it the claimed support is unstated.
pub fn assign_strategies(items: &mut [Item]) {
    for item in items {
        let item_type = item.item_type;
        for citation in &mut item.citations {
            if citation.signal.is_some() && citation.parenthetical.is_none() {
                citation.flag_for_review("missing parenthetical on signaled citation");
            }
            citation.verification_strategy = Some(strategy_for(item_type, citation));
        }
    }
}
