//! Headless mode: one submission, printed, then exit.
//!
//! Runs the same reducer the TUI uses: the input becomes a `SetKeywords` or
//! `ImportQuery` event, `Submit` yields a ticket, and the client's answer is
//! reduced as a completion. The printed draft is therefore exactly what the
//! TUI would have seeded.

use crate::cli::Format;
use chrono::Utc;
use msq_client::{HttpSuggestClient, SuggestClient};
use msq_core::{config::Config, reduce, Completion, FormEvent, FormState, TermGroup};
use serde::Serialize;
use std::fmt::Write as _;

/// What the user asked to suggest for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Raw keyword input, `$`-separated.
    Term(String),
    /// A PubMed boolean query whose keywords are imported first.
    Query(String),
}

/// Submit `input` once through the reducer and return the final form.
pub async fn suggest_once<C: SuggestClient>(client: &C, form: FormState, input: Input) -> FormState {
    let event = match input {
        Input::Term(term) => FormEvent::SetKeywords(term),
        Input::Query(query) => FormEvent::ImportQuery(query),
    };
    let (form, _) = reduce(&form, event);
    let (form, ticket) = reduce(&form, FormEvent::Submit);
    let Some(ticket) = ticket else {
        return form;
    };

    tracing::debug!(term = %ticket.request.term, mode = %ticket.request.mode, "headless submit");
    let outcome = client.suggest(&ticket.request).await;
    let completion = Completion { seq: ticket.seq, outcome, received_at: Utc::now() };
    reduce(&form, FormEvent::Completed(completion)).0
}

/// Run headless mode end to end against the configured endpoint.
///
/// Returns the text to print on success. A failed request is an error whose
/// message is the one the TUI would show in its banner.
pub fn execute(config: &Config, input: Input, format: Format) -> anyhow::Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let client = HttpSuggestClient::new(&config.api)?;
    let form = FormState::with_mode(config.api.default_mode);

    let form = runtime.block_on(suggest_once(&client, form, input));
    if let Some(err) = form.error {
        anyhow::bail!(err);
    }
    render(&form, format)
}

pub fn render(form: &FormState, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(form)),
        Format::Json => render_json(form),
    }
}

/// Human-readable listing: splits, each group with its terms, then the draft.
pub fn render_text(form: &FormState) -> String {
    let mut out = String::new();
    if form.result.is_empty() {
        let _ = writeln!(out, "No suggestions");
    } else {
        let _ = writeln!(out, "Splits: {}", form.result.splits.join(", "));
    }
    for group in &form.result.entries {
        let _ = writeln!(out, "\n{}", group.header());
        for term in &group.terms {
            let _ = writeln!(out, "  {term}");
        }
    }
    let _ = writeln!(out, "\nQuery: {}", form.draft);
    out
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(rename = "Splits")]
    splits: &'a [String],
    #[serde(rename = "Data")]
    data: &'a [TermGroup],
    #[serde(rename = "Query")]
    query: &'a str,
}

/// The response body in its wire shape plus the resulting draft as `Query`.
pub fn render_json(form: &FormState) -> anyhow::Result<String> {
    let out = JsonOutput {
        splits: &form.result.splits,
        data: &form.result.entries,
        query: &form.draft,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}
