//! Background story fetching.
//!
//! [`Fetcher::request`] spawns one fetch on the tokio runtime and returns
//! immediately; the result comes back to the UI thread over an [`mpsc`]
//! channel and is picked up by [`Fetcher::poll`] on the next tick.
//!
//! ## Generations
//!
//! Every request gets a new generation number.  Starting a request aborts
//! the previous task, and `poll` drops any message whose generation is not
//! the latest, so a slow stale response can never overwrite a newer one.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::source::{Batch, StorySource};

/// Outcome of a fetch attempt, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Loading,
    Success(Batch),
    /// Human-readable cause.
    Failure(String),
}

/// A completed fetch, tagged with the generation that started it.
struct FetchMsg {
    generation: u64,
    result: FetchResult,
}

pub struct Fetcher {
    source: Arc<dyn StorySource>,
    runtime: Handle,
    tx: mpsc::Sender<FetchMsg>,
    rx: mpsc::Receiver<FetchMsg>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn StorySource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            runtime,
            tx,
            rx,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Start a new fetch, superseding any fetch still in flight.
    ///
    /// Always returns [`FetchResult::Loading`].
    pub fn request(&mut self) -> FetchResult {
        if let Some(stale) = self.in_flight.take() {
            if !stale.is_finished() {
                log::debug!("aborting fetch generation {}", self.generation);
            }
            stale.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        log::info!("fetching from {} (generation {generation})", source.name());
        self.in_flight = Some(self.runtime.spawn(async move {
            let result = match source.fetch().await {
                Ok(batch) => FetchResult::Success(batch),
                Err(e) => {
                    log::error!("fetch generation {generation} failed: {e}");
                    FetchResult::Failure(e.to_string())
                }
            };
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(FetchMsg { generation, result });
        }));

        FetchResult::Loading
    }

    /// Drain finished fetches and return the latest generation's result, if
    /// it has arrived.  Never blocks.
    pub fn poll(&mut self) -> Option<FetchResult> {
        let mut latest = None;
        while let Ok(msg) = self.rx.try_recv() {
            if msg.generation == self.generation {
                latest = Some(msg.result);
            } else {
                log::debug!(
                    "discarding result of stale generation {} (current {})",
                    msg.generation,
                    self.generation
                );
            }
        }
        if latest.is_some() {
            self.in_flight = None;
        }
        latest
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
