use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use super::item::{BatchItem, ItemId, ItemStatus};
use crate::budget::CompressRequest;
use crate::codec::Codec;
use crate::compress::compress;
use crate::summary::BatchSummary;

/// Result of a [`BatchController::compress_all`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRun {
    /// This call drove the run; `passes` counts passes over the item list,
    /// including re-runs requested while it was busy.
    Completed { passes: u32 },
    /// A run was already in flight; it will make one more pass.
    Coalesced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running { pending: bool },
}

struct State {
    items: Vec<BatchItem>,
    request: CompressRequest,
    run: RunState,
}

struct Inner<C> {
    codec: Arc<C>,
    state: Mutex<State>,
    debouncer: Debouncer,
    next_id: AtomicU64,
}

/// Owns a list of source images and compresses them with a shared request.
///
/// Cloning is cheap and every clone drives the same batch. Compression runs on
/// Tokio's blocking pool, one item at a time.
pub struct BatchController<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for BatchController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Codec + Send + Sync + 'static> BatchController<C> {
    pub fn new(codec: C, request: CompressRequest) -> Self {
        Self::with_debounce(codec, request, DEFAULT_DEBOUNCE)
    }

    /// Like [`new`](Self::new) with a custom delay for [`set_request`](Self::set_request).
    pub fn with_debounce(codec: C, request: CompressRequest, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                codec: Arc::new(codec),
                state: Mutex::new(State {
                    items: Vec::new(),
                    request,
                    run: RunState::Idle,
                }),
                debouncer: Debouncer::new(delay),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn codec(&self) -> &C {
        &self.inner.codec
    }

    /// Add a source image in the `Ready` state.
    pub async fn add(&self, name: impl Into<String>, source: impl Into<Arc<[u8]>>) -> ItemId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let item = BatchItem::new(id, name.into(), source.into());
        tracing::debug!(id, name = %item.name, bytes = item.original_size(), "Item added");
        self.inner.state.lock().await.items.push(item);
        id
    }

    /// Drop an item. A run in flight for it finishes but its result is discarded.
    pub async fn remove(&self, id: ItemId) -> bool {
        let mut state = self.inner.state.lock().await;
        let before = state.items.len();
        state.items.retain(|item| item.id != id);
        state.items.len() != before
    }

    /// Drop every item and any pending debounced run.
    pub async fn clear(&self) {
        self.inner.debouncer.cancel();
        self.inner.state.lock().await.items.clear();
    }

    pub async fn items(&self) -> Vec<BatchItem> {
        self.inner.state.lock().await.items.clone()
    }

    pub async fn item(&self, id: ItemId) -> Option<BatchItem> {
        let state = self.inner.state.lock().await;
        state.items.iter().find(|item| item.id == id).cloned()
    }

    pub async fn request(&self) -> CompressRequest {
        self.inner.state.lock().await.request
    }

    /// Store a new request and, if there is anything to compress, schedule a
    /// debounced [`compress_all`](Self::compress_all).
    pub async fn set_request(&self, request: CompressRequest) {
        let has_items = {
            let mut state = self.inner.state.lock().await;
            state.request = request;
            !state.items.is_empty()
        };

        if has_items {
            let this = self.clone();
            self.inner.debouncer.schedule(async move {
                this.compress_all().await;
            });
        }
    }

    /// Whether a debounced run is armed but has not started.
    pub fn has_pending_run(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.state.lock().await.run != RunState::Idle
    }

    pub async fn summary(&self) -> BatchSummary {
        let state = self.inner.state.lock().await;
        BatchSummary::from_sizes(
            state
                .items
                .iter()
                .map(|item| (item.original_size(), item.output_size())),
        )
    }

    /// Compress every item, one at a time.
    ///
    /// If a run is already in flight this only flags it to make another pass
    /// and returns [`BatchRun::Coalesced`] immediately. The future should be
    /// driven to completion; dropping it mid-run leaves the batch marked busy.
    pub async fn compress_all(&self) -> BatchRun {
        {
            let mut state = self.inner.state.lock().await;
            if let RunState::Running { pending } = &mut state.run {
                *pending = true;
                tracing::debug!("Batch run already in flight, coalescing");
                return BatchRun::Coalesced;
            }
            state.run = RunState::Running { pending: false };
        }

        let mut passes = 0;
        loop {
            passes += 1;
            self.run_pass().await;

            let mut state = self.inner.state.lock().await;
            if state.run == (RunState::Running { pending: true }) {
                state.run = RunState::Running { pending: false };
            } else {
                state.run = RunState::Idle;
                break;
            }
        }

        tracing::info!(passes, "Batch run finished");
        BatchRun::Completed { passes }
    }

    async fn run_pass(&self) {
        let ids: Vec<ItemId> = {
            let state = self.inner.state.lock().await;
            state.items.iter().map(|item| item.id).collect()
        };
        for id in ids {
            self.compress_item(id).await;
        }
    }

    /// Compress a single item with the current request.
    ///
    /// Returns the item's new status, or `None` if the item does not exist,
    /// is already being compressed, or was removed while this run was in
    /// flight. A failure keeps the item's previous outcome.
    pub async fn compress_item(&self, id: ItemId) -> Option<ItemStatus> {
        let (source, request) = {
            let mut state = self.inner.state.lock().await;
            let request = state.request;
            let item = state.items.iter_mut().find(|item| item.id == id)?;
            if item.status == ItemStatus::Working {
                return None;
            }
            item.status = ItemStatus::Working;
            (item.source.clone(), request)
        };

        let codec = self.inner.codec.clone();
        let result = tokio::task::spawn_blocking(move || {
            compress(&*codec, &source, &request).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Compression task failed: {e}"))
        .and_then(|r| r);

        let mut state = self.inner.state.lock().await;
        let item = state.items.iter_mut().find(|item| item.id == id)?;
        match result {
            Ok(outcome) => {
                item.outcome = Some(outcome);
                item.error = None;
                item.status = ItemStatus::Done;
            }
            Err(error) => {
                tracing::warn!(id, name = %item.name, %error, "Item failed to compress");
                item.error = Some(error);
                item.status = ItemStatus::Failed;
            }
        }
        Some(item.status)
    }
}
