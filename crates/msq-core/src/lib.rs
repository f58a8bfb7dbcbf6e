//! msq-core: MeSH suggestion query builder core library.
//!
//! This crate holds everything that does not touch the network or the
//! terminal: the wire model, the form reducer, draft assembly, boolean query
//! import and configuration.
//!
//! # Architecture
//!
//! ```text
//! keys ──► FormEvent ──► reduce ──► FormState ──► widgets
//!                          │
//!                          └──► Ticket ──► client ──► Completion ──┐
//!                                                                  │
//!          FormEvent::Completed ◄──────────────────────────────────┘
//! ```
//!
//! The reducer is the only place state changes. The TUI event loop feeds it
//! key-derived events and request completions in arrival order.

pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod import;
pub mod types;

pub use error::SuggestError;
pub use form::{reduce, Completion, FormEvent, FormState, Phase, Ticket};
pub use types::{MeshTerm, Mode, SuggestionRequest, SuggestionResult, TermGroup};
