//! msq: MeSH suggestion query builder.
//!
//! Terminal tool for turning free-text keywords into a PubMed-style boolean
//! query. The keywords go to a suggestion API, which answers with candidate
//! MeSH terms grouped by keyword; the user ADDs terms to a draft query.
//!
//! # Architecture
//!
//! ```text
//!             ┌──────────── msq-tui (ratatui event loop) ───────────┐
//! key events ─┤                                                      ├─► screen
//!             └──► msq_core::reduce ──► Ticket ──► msq_client::Dispatcher
//!                        ▲                               │
//!                        └──────── Completion ◄──────────┘
//! ```
//!
//! This crate holds the binary's plumbing: argument parsing ([`cli`]) and the
//! one-shot headless mode ([`headless`]). Both are library modules so the
//! integration harnesses can drive them directly.

pub mod cli;
pub mod headless;
