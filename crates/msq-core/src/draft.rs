//! Query draft assembly.
//!
//! The draft is free text the user owns. The tool only ever touches it to:
//!
//! - seed it from the splits of a response while it is still empty;
//! - append ` OR label[MeSH]` when a single term is ADDed;
//! - append an `AND` of per-group `OR` clauses for a selection of terms.

use std::collections::BTreeMap;

/// Field tag appended to each split when seeding.
pub const TIAB_TAG: &str = "[tiab]";
/// Field tag appended to an ADDed term.
pub const MESH_TAG: &str = "[MeSH]";
/// Field tag for terms added from a selection.
pub const MESH_TERMS_TAG: &str = "[MeSH Terms]";
/// Separator between clauses.
pub const OR_SEPARATOR: &str = " OR ";
/// Separator between groups of a selection.
pub const AND_SEPARATOR: &str = " AND ";

/// Initial draft for a set of splits: `fever[tiab] OR cough[tiab]`.
///
/// No splits gives an empty string.
pub fn seed_from_splits(splits: &[String]) -> String {
    splits
        .iter()
        .map(|s| format!("{s}{TIAB_TAG}"))
        .collect::<Vec<_>>()
        .join(OR_SEPARATOR)
}

/// Append ` OR {label}[MeSH]` to `draft`.
///
/// Unconditional: duplicates are not detected and an empty draft is not
/// special-cased, so `""` becomes ` OR label[MeSH]`.
pub fn append_term(draft: &str, label: &str) -> String {
    format!("{draft}{OR_SEPARATOR}{label}{MESH_TAG}")
}

/// Append a selection of terms, each tagged with its keyword group.
///
/// Terms of one group are OR-ed (parenthesised when there is more than one),
/// groups are AND-ed in ascending group order, and the whole clause is joined
/// to the trimmed draft with ` AND `:
///
/// ```text
/// [(0, "Fever"), (1, "Cough"), (0, "Hyperthermia")]
///   => ("Fever"[MeSH Terms] OR "Hyperthermia"[MeSH Terms]) AND "Cough"[MeSH Terms]
/// ```
///
/// Repeats of a label within a group are added once. An empty selection
/// leaves the draft untouched.
pub fn append_grouped(draft: &str, picks: &[(usize, String)]) -> String {
    if picks.is_empty() {
        return draft.to_string();
    }

    let mut by_group: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (group, label) in picks {
        let terms = by_group.entry(*group).or_default();
        if !terms.contains(&label.as_str()) {
            terms.push(label.as_str());
        }
    }

    let clause = by_group
        .values()
        .map(|terms| {
            let ors = terms
                .iter()
                .map(|t| format!("\"{t}\"{MESH_TERMS_TAG}"))
                .collect::<Vec<_>>();
            if ors.len() == 1 {
                ors.concat()
            } else {
                format!("({})", ors.join(OR_SEPARATOR))
            }
        })
        .collect::<Vec<_>>()
        .join(AND_SEPARATOR);

    let base = draft.trim();
    if base.is_empty() {
        clause
    } else {
        format!("{base}{AND_SEPARATOR}{clause}")
    }
}
