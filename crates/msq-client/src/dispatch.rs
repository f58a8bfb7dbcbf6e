//! Submission dispatcher: runs tickets in the background.
//!
//! Each [`Ticket`] becomes its own tokio task. Nothing is cancelled or
//! queued: overlapping submissions all run to completion and each posts its
//! [`Completion`] on the channel. Deciding which completion counts is the
//! reducer's job, not the dispatcher's.

use crate::SuggestClient;
use chrono::Utc;
use msq_core::{Completion, Ticket};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Spawns one task per ticket on a runtime handle.
pub struct Dispatcher<C> {
    client: Arc<C>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<C: SuggestClient> Dispatcher<C> {
    /// Create a dispatcher and the receiving end of its completion channel.
    pub fn new(client: C, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self { client: Arc::new(client), runtime, tx };
        (dispatcher, rx)
    }

    /// Send `ticket` in the background. Returns immediately.
    pub fn dispatch(&self, ticket: Ticket) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tracing::debug!(seq = ticket.seq, term = %ticket.request.term, "dispatching ticket");

        self.runtime.spawn(async move {
            let outcome = client.suggest(&ticket.request).await;
            if let Err(err) = &outcome {
                tracing::warn!(
                    seq = ticket.seq,
                    status = ?err.status(),
                    error = %err,
                    "request failed"
                );
            }
            let completion = Completion { seq: ticket.seq, outcome, received_at: Utc::now() };
            if tx.send(completion).is_err() {
                tracing::debug!(seq = ticket.seq, "completion dropped: receiver gone");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
