//! Boolean query import: turns a PubMed-style boolean query into keyword
//! groups, and groups into a `$`-delimited term for the suggestion API.
//!
//! # Rules
//!
//! - Split on `AND` (any case). An `AND NOT` is not a split point: the
//!   fragment that contains it is negative and is dropped whole.
//! - Split each remaining fragment on `OR`.
//! - Strip field tags (`[tiab]`, `[MeSH Terms]`, `[mh:noexp]`, …), `*`
//!   wildcards, parentheses, straight and curly quotes, and a leading `NOT`.
//! - Drop empty tokens and bare operators.
//! - If no group survives, fall back to one group of the comma-separated
//!   tokens, or of the whole trimmed input when there are no commas.

use regex::Regex;
use std::sync::LazyLock;

static FIELD_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\[\s*(?:",
        r"ti|ab|tiab|tw|all\s+fields|mesh\s+terms?|major\s+mesh|mp|mh|sh|rn|nm|ot|",
        r"pt|la|jw|so|af|aud|cois|mf|px|rf|ro|rx|sb|si|subh|ec|ip|lr|od|pg|pl|vi|",
        r"au|corp|fau|gr|invt|ir|irad|cn|ed|fd|auid|book|series|pmid|tr|dn|ddt|isbn|",
        r"edat|pdat|mhda|crdt|entrez\s+date|publication\s+date|mesh\s+date|create\s+date",
        r")\s*(?::\w+)?\s*\]",
    ))
    .expect("field tag pattern must compile")
});

static AND_NOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAND\s+NOT\b").expect("AND NOT pattern must compile"));
static AND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAND\b").expect("AND pattern must compile"));
static OR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOR\b").expect("OR pattern must compile"));
static LEADING_NOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*NOT\s+").expect("NOT pattern must compile"));

/// Marks an `AND NOT` so the plain `AND` split leaves it attached to its fragment.
const AND_NOT_MARK: &str = "\u{0}ANDNOT\u{0}";

/// Separator between keywords in the API's `term` parameter.
pub const TERM_SEPARATOR: char = '$';

/// Parse a boolean query into groups of keywords. Empty input gives no groups.
pub fn parse_boolean_query(query: &str) -> Vec<Vec<String>> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let marked = AND_NOT.replace_all(query, AND_NOT_MARK);

    let groups: Vec<Vec<String>> = AND
        .split(&marked)
        .filter(|fragment| !fragment.contains(AND_NOT_MARK))
        .map(|fragment| {
            OR.split(fragment)
                .map(clean_token)
                .filter(|t| !t.is_empty() && !is_operator(t))
                .collect::<Vec<_>>()
        })
        .filter(|terms| !terms.is_empty())
        .collect();

    if !groups.is_empty() {
        return groups;
    }

    let fallback: Vec<String> = if query.contains(',') {
        query
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![query.trim().to_string()]
    };

    if fallback.is_empty() {
        Vec::new()
    } else {
        vec![fallback]
    }
}

/// Flatten groups into one `$`-delimited term, in order.
pub fn groups_to_term(groups: &[Vec<String>]) -> String {
    groups
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(&TERM_SEPARATOR.to_string())
}

fn clean_token(raw: &str) -> String {
    let term = FIELD_TAG.replace_all(raw, "");
    let term: String = term
        .chars()
        .filter(|c| !matches!(c, '*' | '(' | ')' | '"' | '\'' | '\u{201c}' | '\u{201d}'))
        .collect();
    LEADING_NOT.replace(&term, "").trim().to_string()
}

fn is_operator(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "and" | "or" | "not" | "and not"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn and_of_ors() {
        let parsed = parse_boolean_query(
            r#"("diabetes mellitus" OR insulin) AND ("heart attack"[tiab] OR "myocardial infarction")"#,
        );
        assert_eq!(
            parsed,
            groups(&[
                &["diabetes mellitus", "insulin"],
                &["heart attack", "myocardial infarction"],
            ])
        );
    }

    #[test]
    fn fragment_carrying_and_not_is_dropped() {
        assert_eq!(
            parse_boolean_query("(fever OR pyrexia) AND NOT malaria AND cough"),
            groups(&[&["cough"]])
        );
    }

    #[test]
    fn only_negative_fragment_falls_back_to_whole_input() {
        assert_eq!(
            parse_boolean_query("fever OR pyrexia AND NOT malaria"),
            groups(&[&["fever OR pyrexia AND NOT malaria"]])
        );
    }

    #[rstest]
    #[case("pain[MeSH Terms]", "pain")]
    #[case("neoplasms[mh:noexp]", "neoplasms")]
    #[case("cancer*[tiab]", "cancer")]
    #[case("\u{201c}heart failure\u{201d}", "heart failure")]
    #[case("NOT smoking", "smoking")]
    fn tokens_are_cleaned(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_boolean_query(input), groups(&[&[expected]]));
    }

    #[test]
    fn lowercase_operators_split_too() {
        assert_eq!(
            parse_boolean_query("a or b and c"),
            groups(&[&["a", "b"], &["c"]])
        );
    }

    #[test]
    fn operators_inside_words_do_not_split() {
        assert_eq!(
            parse_boolean_query("Andes OR oral"),
            groups(&[&["Andes", "oral"]])
        );
    }

    #[test]
    fn bare_operators_fall_back_to_whole_input() {
        assert_eq!(parse_boolean_query(" OR "), groups(&[&["OR"]]));
    }

    #[test]
    fn comma_list_without_operators_is_one_keyword() {
        assert_eq!(
            parse_boolean_query("diabetes, insulin"),
            groups(&[&["diabetes, insulin"]])
        );
    }

    #[test]
    fn comma_fallback_applies_when_no_group_survives() {
        assert_eq!(
            parse_boolean_query("x AND NOT y, z"),
            groups(&[&["x AND NOT y", "z"]])
        );
    }

    #[test]
    fn commas_inside_boolean_query_stay_in_tokens() {
        assert_eq!(
            parse_boolean_query("pain, chronic OR backache"),
            groups(&[&["pain, chronic", "backache"]])
        );
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(parse_boolean_query("   ").is_empty());
    }

    #[test]
    fn groups_flatten_to_dollar_term() {
        let g = groups(&[&["diabetes mellitus", "insulin"], &["heart attack"]]);
        assert_eq!(groups_to_term(&g), "diabetes mellitus$insulin$heart attack");
    }
}
