//! A tile grid that follows its container width.
//!
//! `ResponsiveGrid` ties the cached planner to the relayout debouncer:
//! resize notifications are debounced, item-list changes relayout
//! immediately, and the current [`GridShape`] is published on a `watch`
//! channel. A relayout that lands on the same shape (same column count, same
//! items) does not wake subscribers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::debug;

use crate::layout::debounce::RelayoutDebouncer;
use crate::layout::grid::GridConfig;
use crate::layout::layout_cache::{CachedGridPlanner, GridShape};

struct GridState {
    keys: Vec<String>,
    width: Option<f32>,
}

/// Shared between the grid handle and the debounce task.
struct Inner {
    planner: CachedGridPlanner,
    state: RwLock<GridState>,
    /// Held from reading `state` until the shape is published, so a relayout
    /// that read older state can never publish after one that read newer.
    relayout_lock: Mutex<()>,
    shape_tx: watch::Sender<Option<Arc<GridShape>>>,
}

impl Inner {
    fn relayout(&self) {
        let _relayout = self.relayout_lock.lock();
        let state = self.state.read();
        let Some(width) = state.width else {
            return;
        };
        let shape = self.planner.compute(&state.keys, width);
        drop(state);

        let changed = self.shape_tx.send_if_modified(|current| {
            if current
                .as_ref()
                .is_some_and(|existing| Arc::ptr_eq(existing, &shape))
            {
                return false;
            }
            *current = Some(Arc::clone(&shape));
            true
        });
        if changed {
            debug!(
                columns = shape.columns,
                rows = shape.rows,
                items = shape.item_count(),
                "Published grid shape"
            );
        }
    }
}

pub struct ResponsiveGrid {
    inner: Arc<Inner>,
    debouncer: RelayoutDebouncer,
}

impl ResponsiveGrid {
    /// Creates a grid and starts its debounce task on the current tokio
    /// runtime.
    pub fn spawn(config: GridConfig, window: Duration) -> Self {
        let (shape_tx, _) = watch::channel(None);
        let inner = Arc::new(Inner {
            planner: CachedGridPlanner::new(config),
            state: RwLock::new(GridState {
                keys: Vec::new(),
                width: None,
            }),
            relayout_lock: Mutex::new(()),
            shape_tx,
        });

        let task_inner = Arc::clone(&inner);
        let debouncer = RelayoutDebouncer::spawn(window, move |width| {
            task_inner.state.write().width = Some(width);
            task_inner.relayout();
        });

        Self { inner, debouncer }
    }

    /// Replaces the item list (scene ids, filenames) and relays out at once.
    pub fn set_items(&self, keys: Vec<String>) {
        self.inner.state.write().keys = keys;
        self.inner.relayout();
    }

    /// Sets the container width without debouncing, e.g. for the first layout.
    pub fn set_width_now(&self, container_width: f32) {
        self.inner.state.write().width = Some(container_width);
        self.inner.relayout();
    }

    /// Reports a container resize. The relayout runs once resizing settles.
    pub fn resize(&self, container_width: f32) {
        self.debouncer.notify(container_width);
    }

    /// The most recently published shape.
    pub fn shape(&self) -> Option<Arc<GridShape>> {
        self.inner.shape_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<GridShape>>> {
        self.inner.shape_tx.subscribe()
    }

    pub fn config(&self) -> GridConfig {
        self.inner.planner.planner.config
    }

    /// Stops debouncing; pending resizes are discarded.
    pub fn shutdown(&mut self) {
        self.debouncer.shutdown();
    }
}
