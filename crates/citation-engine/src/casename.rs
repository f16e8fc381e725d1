//! Case-name cleaning and comparison heuristics.
//!
//! Briefs abbreviate party names freely ("Roderick Beham v. State" vs
//! "Beham v. State"), so comparisons run on a normalized surname form.
//! Government-entity parties ("United States", "State", "Commonwealth")
//! are kept whole.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VERSUS: Regex = Regex::new(r"\s+v\.?\s+").expect("versus pattern");
    static ref SIC: Regex = Regex::new(r"(?i)\s*\[sic\]\s*").expect("sic pattern");
    static ref LEADING_DIGITS: Regex = Regex::new(r"^\d+\s+").expect("leading digits pattern");
}

const ENTITY_WORDS: &[&str] = &["united", "people", "state", "commonwealth", "in", "the", "ex"];

/// Scrub artifacts that bleed into extracted party names: `[sic]`
/// annotations, page numbers glued to the front, trailing punctuation
/// and titles after a comma ("Yukins, Warden").
pub fn clean_party(raw: &str) -> String {
    let name = SIC.replace_all(raw, " ");
    let name = name.split(',').next().unwrap_or("").trim();
    let name = LEADING_DIGITS.replace(name, "");
    name.trim_end_matches([',', ';', ':']).trim().to_string()
}

/// Reduce one party to its comparison form: the surname, unless the
/// party is a government entity.
fn normalize_party(party: &str) -> String {
    let party = clean_party(party);
    let words: Vec<&str> = party.split_whitespace().collect();
    if words.len() <= 1 {
        return party;
    }
    if ENTITY_WORDS.contains(&words[0].to_lowercase().as_str()) {
        return party;
    }
    words.last().unwrap_or(&"").to_string()
}

/// Normalize a full case name for comparison:
/// "Roderick Beham v. State" -> "Beham v. State".
pub fn normalize_case_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = VERSUS.splitn(name, 2).collect();
    if parts.len() != 2 {
        return clean_party(name);
    }
    let plaintiff = normalize_party(parts[0]);
    let defendant = normalize_party(parts[1]);
    format!("{} v. {}", plaintiff, defendant)
}

/// Whether two case names refer to the same case after normalization.
pub fn case_names_match(a: &str, b: &str) -> bool {
    !a.is_empty() && normalize_case_name(a).eq_ignore_ascii_case(&normalize_case_name(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_given_names() {
        assert_eq!(
            normalize_case_name("Roderick Beham v. State"),
            "Beham v. State"
        );
    }

    #[test]
    fn test_strips_trailing_titles() {
        assert_eq!(
            normalize_case_name("Debra Dando v. Joan Yukins, Warden"),
            "Dando v. Yukins"
        );
    }

    #[test]
    fn test_keeps_government_entities() {
        assert_eq!(
            normalize_case_name("United States v. Salerno"),
            "United States v. Salerno"
        );
        assert_eq!(
            normalize_case_name("State of Texas v. Johnson"),
            "State of Texas v. Johnson"
        );
    }

    #[test]
    fn test_non_versus_name_passes_through() {
        assert_eq!(normalize_case_name("In re Winship"), "In re Winship");
    }

    #[test]
    fn test_removes_sic_annotations() {
        assert_eq!(
            normalize_case_name("Rodgriguez [sic] v. State"),
            "Rodgriguez v. State"
        );
    }

    #[test]
    fn test_removes_page_number_bleed() {
        assert_eq!(clean_party("40 State"), "State");
    }

    #[test]
    fn test_names_match_across_forms() {
        assert!(case_names_match(
            "Roderick Beham v. State",
            "Beham v. State"
        ));
        assert!(!case_names_match("Beham v. State", "Brown v. State"));
        assert!(!case_names_match("", ""));
    }
}
