//! Asynchronous dataset loading
//!
//! One-shot load per requested source: `Loading` transitions to a terminal
//! `Ready` or `Failed`, with no retry. Requesting another source restarts
//! the machine from `Loading` and supersedes any load still in flight
//! (last-request-wins).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::schema::PlaceTable;
use crate::sources::PlaceSource;

/// Load status the UI renders from.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(PlaceTable),
    Failed(String),
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Loading
    }
}

/// Drives dataset loads on the app's tokio runtime and publishes the
/// resulting [`LoadState`] behind a shared lock.
pub struct DatasetLoader {
    state: Arc<RwLock<LoadState>>,
    generation: Arc<AtomicU64>,
    fresh: Arc<AtomicBool>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(LoadState::Loading)),
            generation: Arc::new(AtomicU64::new(0)),
            fresh: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared handle to the load state.
    pub fn state(&self) -> Arc<RwLock<LoadState>> {
        self.state.clone()
    }

    /// True exactly once after each `Ready` transition. The app polls this
    /// each frame to ingest a freshly loaded dataset.
    pub fn take_ready(&self) -> bool {
        self.fresh.swap(false, Ordering::SeqCst)
    }

    /// Start loading from `source`, superseding any load still in flight.
    /// `on_done` runs after the terminal state transition and is used to
    /// request a repaint.
    pub fn request(
        &self,
        runtime: &tokio::runtime::Handle,
        source: Box<dyn PlaceSource>,
        on_done: impl Fn() + Send + Sync + 'static,
    ) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write() = LoadState::Loading;

        let state = self.state.clone();
        let current = self.generation.clone();
        let fresh = self.fresh.clone();

        info!("loading places from {}", source.source_name());

        runtime.spawn(async move {
            let result = source.load_places().await;

            // The generation check and the state write share one lock so a
            // superseded load can never clobber a newer one.
            let mut slot = state.write();
            if current.load(Ordering::SeqCst) != generation {
                info!("discarding superseded load of {}", source.source_name());
                return;
            }

            match result {
                Ok(table) => {
                    info!(
                        "loaded {} places from {} ({} rows skipped)",
                        table.places.len(),
                        table.source_name,
                        table.diagnostics.len()
                    );
                    *slot = LoadState::Ready(table);
                    fresh.store(true, Ordering::SeqCst);
                }
                Err(err) => {
                    error!("failed to load places: {}", err);
                    *slot = LoadState::Failed(err.to_string());
                }
            }

            drop(slot);
            on_done();
        })
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}
