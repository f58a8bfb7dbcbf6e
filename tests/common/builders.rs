//! Test builders: ergonomic constructors for configs, results and
//! completions.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::Utc;
use msq_core::config::{ApiConfig, Config};
use msq_core::{Completion, FormEvent, MeshTerm, SuggestError, SuggestionResult, TermGroup};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Default `[api]` section pointed at `base_url`.
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig { base_url: base_url.to_string(), ..ApiConfig::default() }
}

/// Full default config pointed at `base_url`.
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::defaults();
    config.api = api_config(base_url);
    config
}

// ---------------------------------------------------------------------------
// ResultBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`SuggestionResult`] fixtures.
///
/// ```rust
/// let result = ResultBuilder::new()
///     .split("pain")
///     .group(&["pain"], &[("D0100", "Pain")])
///     .build();
/// ```
#[derive(Default)]
pub struct ResultBuilder {
    result: SuggestionResult,
}

impl ResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn split(mut self, split: &str) -> Self {
        self.result.splits.push(split.to_string());
        self
    }

    pub fn group(mut self, keywords: &[&str], terms: &[(&str, &str)]) -> Self {
        self.result.entries.push(TermGroup {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            terms: terms.iter().map(|(id, label)| MeshTerm::new(*id, *label)).collect(),
        });
        self
    }

    pub fn build(self) -> SuggestionResult {
        self.result
    }
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

/// `Completed` event for ticket `seq`, stamped now.
pub fn completed(seq: u64, outcome: Result<SuggestionResult, SuggestError>) -> FormEvent {
    FormEvent::Completed(Completion { seq, outcome, received_at: Utc::now() })
}
