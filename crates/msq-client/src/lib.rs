//! msq-client: talks to the MeSH suggestion API.
//!
//! [`HttpSuggestClient`] performs one `GET` per request. [`Dispatcher`]
//! runs each [`Ticket`](msq_core::Ticket) as its own tokio task and posts the
//! [`Completion`](msq_core::Completion) back over a channel, so the caller's
//! event loop never blocks on the network.

pub mod dispatch;
pub mod http;

pub use dispatch::Dispatcher;
pub use http::HttpSuggestClient;

use msq_core::{SuggestError, SuggestionRequest, SuggestionResult};
use std::future::Future;

/// Anything that can answer a [`SuggestionRequest`].
///
/// Implemented by [`HttpSuggestClient`] for real use and by in-memory stubs
/// in tests.
pub trait SuggestClient: Send + Sync + 'static {
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl Future<Output = Result<SuggestionResult, SuggestError>> + Send;
}
