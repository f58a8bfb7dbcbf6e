//! Shared test utilities for msq integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fake_suggest_api;
pub mod fixtures;

pub use builders::*;
pub use fake_suggest_api::FakeSuggestApi;
pub use fixtures::*;
