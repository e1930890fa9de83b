use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{config::ViewerConfig, filter::search_suggestions, property::Property};

/// Suggestions for one debounced search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Increases with every submitted search.
    pub generation: u64,
    pub text: String,
    /// Source indices of matching records, at most the configured limit.
    pub matches: Vec<usize>,
}

/// Runs free-text search after a quiet period, cancelling any search still
/// waiting or running when a newer one is submitted. Results arrive on the
/// receiver returned by [`SearchDebouncer::new`]; a cancelled search never
/// delivers. Must be used inside a tokio runtime.
pub struct SearchDebouncer {
    source: Arc<[Property]>,
    delay: Duration,
    limit: usize,
    generation: u64,
    in_flight: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
}

impl SearchDebouncer {
    pub fn new(source: Arc<[Property]>, config: &ViewerConfig) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            source,
            delay: config.search_debounce(),
            limit: config.suggestion_limit,
            generation: 0,
            in_flight: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Swap the searched records; cancels the pending search.
    pub fn set_source(&mut self, source: Arc<[Property]>) {
        self.cancel();
        self.source = source;
    }

    /// Schedule a search for `text`, superseding the previous one.
    pub fn submit(&mut self, text: &str) -> u64 {
        self.cancel();
        self.generation += 1;

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let (generation, delay, limit) = (self.generation, self.delay, self.limit);
        let (source, tx, text) = (self.source.clone(), self.tx.clone(), text.trim().to_string());

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!(generation, "search cancelled while waiting");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let matches = search_suggestions(&source, &text, limit);
            if token.is_cancelled() { return }

            let _ = tx.send(SearchOutcome { generation, text, matches });
        });

        generation
    }

    /// Cancel the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) { self.cancel() }
}
