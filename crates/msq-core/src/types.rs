//! Core types for msq-core.
//!
//! This module defines the request and response model of the suggestion API:
//! the [`Mode`] selector, the outgoing [`SuggestionRequest`] and the decoded
//! [`SuggestionResult`] with its [`TermGroup`]s.
//!
//! Decoding is strict. A body that does not match the expected shape is a
//! [`SuggestError::Decode`], never a partially filled result.

use crate::error::SuggestError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Term-expansion strategy. What each one does is up to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    #[default]
    Semantic,
    Fragment,
    Atomic,
    #[allow(clippy::upper_case_acronyms)]
    ATM,
    MetaMap,
    #[allow(clippy::upper_case_acronyms)]
    UMLS,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 6] = [
        Mode::Semantic,
        Mode::Fragment,
        Mode::Atomic,
        Mode::ATM,
        Mode::MetaMap,
        Mode::UMLS,
    ];

    /// Literal sent as the `type` query parameter. Case-sensitive on the wire.
    pub fn as_wire(self) -> &'static str {
        match self {
            Mode::Semantic => "Semantic",
            Mode::Fragment => "Fragment",
            Mode::Atomic => "Atomic",
            Mode::ATM => "ATM",
            Mode::MetaMap => "MetaMap",
            Mode::UMLS => "UMLS",
        }
    }

    /// Human-readable label shown next to the radio button.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Semantic => "Semantic-BERT",
            Mode::Fragment => "Fragment-BERT",
            Mode::Atomic => "Atomic-BERT",
            Mode::ATM => "ATM",
            Mode::MetaMap => "MetaMap",
            Mode::UMLS => "UMLS",
        }
    }

    /// Position of this mode in [`Mode::ALL`].
    pub fn index(self) -> usize {
        Mode::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    /// Next mode, wrapping around.
    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    /// Previous mode, wrapping around.
    pub fn prev(self) -> Mode {
        Mode::ALL[(self.index() + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Accepts the wire literal or the display label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_wire().eq_ignore_ascii_case(s) || m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Mode::ALL.iter().map(|m| m.as_wire()).collect();
                format!("unknown mode {s:?} (expected one of {})", known.join(", "))
            })
    }
}

impl TryFrom<String> for Mode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_wire().to_string()
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One suggestion request. Built fresh per submission and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Raw keyword input, possibly `$`-delimited. Sent as-is, empty allowed.
    pub term: String,
    pub mode: Mode,
}

impl SuggestionRequest {
    pub fn new(term: impl Into<String>, mode: Mode) -> Self {
        Self { term: term.into(), mode }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A single vocabulary term: identifier plus label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshTerm {
    pub id: String,
    pub label: String,
}

impl MeshTerm {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

impl fmt::Display for MeshTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.label)
    }
}

/// Candidate terms for one or more keywords.
///
/// Extra keys the server sends alongside these (e.g. `type`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TermGroup {
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    /// Terms in the order the server listed them.
    #[serde(
        rename = "MeSH_Terms",
        serialize_with = "serialize_terms",
        deserialize_with = "deserialize_terms"
    )]
    pub terms: Vec<MeshTerm>,
}

impl TermGroup {
    /// Header text for this group, e.g. `Keyword: fever, pyrexia`.
    pub fn header(&self) -> String {
        format!("Keyword: {}", self.keywords.join(", "))
    }
}

/// Decoded response body of the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuggestionResult {
    /// Keyword fragments the API derived from the request term.
    #[serde(rename = "Splits")]
    pub splits: Vec<String>,
    #[serde(rename = "Data")]
    pub entries: Vec<TermGroup>,
}

impl SuggestionResult {
    /// Decode a response body. Any deviation from the expected shape is a
    /// [`SuggestError::Decode`].
    pub fn from_json(body: &[u8]) -> Result<Self, SuggestError> {
        serde_json::from_slice(body).map_err(|e| SuggestError::Decode(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty() && self.entries.is_empty()
    }

    /// Total number of terms across all groups.
    pub fn term_count(&self) -> usize {
        self.entries.iter().map(|g| g.terms.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Ordered term map (de)serialisation
// ---------------------------------------------------------------------------

fn serialize_terms<S: Serializer>(terms: &[MeshTerm], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(terms.len()))?;
    for term in terms {
        map.serialize_entry(&term.id, &term.label)?;
    }
    map.end()
}

fn deserialize_terms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<MeshTerm>, D::Error> {
    struct TermsVisitor;

    impl<'de> Visitor<'de> for TermsVisitor {
        type Value = Vec<MeshTerm>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping term identifiers to labels")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut terms: Vec<MeshTerm> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((id, label)) = access.next_entry::<String, String>()? {
                // a repeated id keeps its first position and takes the last label
                match terms.iter_mut().find(|t| t.id == id) {
                    Some(existing) => existing.label = label,
                    None => terms.push(MeshTerm { id, label }),
                }
            }
            Ok(terms)
        }
    }

    deserializer.deserialize_map(TermsVisitor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
