//! The suggestion form: an immutable state snapshot and the reducer that
//! advances it.
//!
//! Every user action and every request completion is a [`FormEvent`]. The
//! reducer never performs I/O; when an event needs a request sent it hands
//! back a [`Ticket`] and the caller is responsible for delivering the outcome
//! as [`FormEvent::Completed`].
//!
//! # Overlapping submissions
//!
//! Each ticket carries a sequence number one higher than the previous one.
//! Only the completion of the newest ticket is applied; anything older is
//! dropped without touching the state. [`FormEvent::Reset`] also advances the
//! sequence so in-flight requests from before the reset are dropped.

use crate::draft;
use crate::error::SuggestError;
use crate::types::{Mode, SuggestionRequest, SuggestionResult};
use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Outcome of one ticket, as delivered back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub seq: u64,
    pub outcome: Result<SuggestionResult, SuggestError>,
    pub received_at: DateTime<Utc>,
}

/// A submission the caller must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub request: SuggestionRequest,
}

/// Everything that can change the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Replace the keyword input.
    SetKeywords(String),
    /// Select a mode.
    SetMode(Mode),
    /// Send the current keywords and mode.
    Submit,
    /// A request finished.
    Completed(Completion),
    /// Append ` OR {label}[MeSH]` to the draft.
    AddTerm(String),
    /// Append a selection of `(result entry index, label)` pairs to the
    /// draft, OR-ed within each keyword group and AND-ed across groups.
    AddSelected(Vec<(usize, String)>),
    /// Overwrite the draft with user-typed text.
    EditDraft(String),
    /// Replace the keyword input with the keywords of an imported boolean
    /// query and remember its groups. Ignored when the query yields no
    /// keywords.
    ImportQuery(String),
    /// Clear keywords, results, draft and error. The mode is kept.
    Reset,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// What the user currently sees, reduced to one of four phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Error,
    Success,
}

/// Snapshot of the whole form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    /// Keyword input, sent verbatim as `term`.
    pub term: String,
    pub mode: Mode,
    /// Last successfully received result. Failures leave it alone.
    pub result: SuggestionResult,
    /// The boolean query under construction.
    pub draft: String,
    /// True while the newest ticket is outstanding.
    pub loading: bool,
    /// Message of the newest failed request, cleared on the next submit.
    pub error: Option<String>,
    /// When `result` arrived. `None` until the first success.
    pub received_at: Option<DateTime<Utc>>,
    /// Keyword groups of the last imported query. Kept until the next
    /// import or reset.
    pub groups: Vec<Vec<String>>,
    /// Sequence number of the newest ticket issued (0 = none yet).
    latest_seq: u64,
}

impl FormState {
    /// Initial state with a preselected mode.
    pub fn with_mode(mode: Mode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.received_at.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Sequence number of the newest ticket issued.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Keyword group of result entry `entry`: the first imported group that
    /// shares a keyword with it (any case), otherwise a group of its own
    /// numbered after the imported ones.
    pub fn group_of(&self, entry: usize) -> usize {
        let keywords = self
            .result
            .entries
            .get(entry)
            .map(|e| e.keywords.as_slice())
            .unwrap_or_default();
        self.groups
            .iter()
            .position(|group| {
                group
                    .iter()
                    .any(|k| keywords.iter().any(|kw| kw.eq_ignore_ascii_case(k)))
            })
            .unwrap_or(self.groups.len() + entry)
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Apply `event` to `state`, returning the next state and, for
/// [`FormEvent::Submit`], the ticket to send.
pub fn reduce(state: &FormState, event: FormEvent) -> (FormState, Option<Ticket>) {
    let mut next = state.clone();

    let ticket = match event {
        FormEvent::SetKeywords(term) => {
            next.term = term;
            None
        }
        FormEvent::SetMode(mode) => {
            next.mode = mode;
            None
        }
        FormEvent::Submit => {
            next.latest_seq += 1;
            next.loading = true;
            next.error = None;
            Some(Ticket {
                seq: next.latest_seq,
                request: SuggestionRequest::new(next.term.clone(), next.mode),
            })
        }
        FormEvent::Completed(completion) => {
            if completion.seq == next.latest_seq && next.latest_seq != 0 {
                apply_completion(&mut next, completion);
            }
            None
        }
        FormEvent::AddTerm(label) => {
            next.draft = draft::append_term(&next.draft, &label);
            None
        }
        FormEvent::AddSelected(picks) => {
            let grouped: Vec<(usize, String)> = picks
                .into_iter()
                .map(|(entry, label)| (next.group_of(entry), label))
                .collect();
            next.draft = draft::append_grouped(&next.draft, &grouped);
            None
        }
        FormEvent::EditDraft(text) => {
            next.draft = text;
            None
        }
        FormEvent::ImportQuery(query) => {
            let groups = crate::import::parse_boolean_query(&query);
            if !groups.is_empty() {
                next.term = crate::import::groups_to_term(&groups);
                next.groups = groups;
            }
            None
        }
        FormEvent::Reset => {
            next = FormState {
                mode: next.mode,
                latest_seq: next.latest_seq + 1,
                ..FormState::default()
            };
            None
        }
    };

    (next, ticket)
}

fn apply_completion(state: &mut FormState, completion: Completion) {
    state.loading = false;
    match completion.outcome {
        Ok(result) => {
            if state.draft.is_empty() {
                state.draft = draft::seed_from_splits(&result.splits);
            }
            state.result = result;
            state.error = None;
            state.received_at = Some(completion.received_at);
        }
        Err(err) => {
            state.error = Some(err.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
