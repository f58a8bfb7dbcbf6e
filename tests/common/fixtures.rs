//! Canned response bodies and queries used across harnesses.

/// `{"Splits":[],"Data":[]}`: a valid answer with nothing in it.
pub const EMPTY_BODY: &str = r#"{"Splits":[],"Data":[]}"#;

/// One group for `pain`, one term.
pub const PAIN_BODY: &str = r#"{
  "Splits": ["pain"],
  "Data": [
    {"Keywords": ["pain"], "MeSH_Terms": {"D0100": "Pain"}}
  ]
}"#;

/// Two groups; the first lists its terms out of id order on purpose, and the
/// server's extra `type` key must be ignored.
pub const FEVER_COUGH_BODY: &str = r#"{
  "Splits": ["fever", "cough"],
  "Data": [
    {
      "Keywords": ["fever"],
      "type": "Semantic",
      "MeSH_Terms": {"D006323": "Hyperthermia", "D005334": "Fever"}
    },
    {"Keywords": ["cough"], "MeSH_Terms": {"D003371": "Cough"}}
  ]
}"#;

/// Not JSON at all.
pub const MALFORMED_BODY: &str = "<html>502 Bad Gateway</html>";

/// Valid JSON, wrong shape (`Data` is an object, not a list).
pub const WRONG_SHAPE_BODY: &str = r#"{"Splits":["pain"],"Data":{"Keywords":["pain"]}}"#;

/// A two-clause boolean query and the groups it imports to.
pub const BOOLEAN_QUERY: &str =
    r#"("diabetes mellitus" OR insulin) AND ("heart attack"[tiab] OR "myocardial infarction")"#;

pub fn boolean_query_groups() -> Vec<Vec<String>> {
    vec![
        vec!["diabetes mellitus".to_string(), "insulin".to_string()],
        vec!["heart attack".to_string(), "myocardial infarction".to_string()],
    ]
}
