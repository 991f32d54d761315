//! Debounced relayout scheduling.
//!
//! Resize notifications can arrive at every pixel of a drag. The debouncer
//! keeps only the latest width and runs the relayout callback once the
//! notifications have been quiet for the whole window. Each new notification
//! restarts the window; intermediate widths are never processed.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Default quiescence window before a relayout runs.
pub const DEFAULT_RELAYOUT_WINDOW: Duration = Duration::from_millis(100);

/// Coalesces width notifications into single delayed relayouts.
///
/// Dropping the debouncer (or calling [`shutdown`](Self::shutdown)) cancels any
/// pending relayout.
pub struct RelayoutDebouncer {
    width_tx: watch::Sender<Option<f32>>,
    task: Option<JoinHandle<()>>,
    window: Duration,
}

impl RelayoutDebouncer {
    /// Starts the debounce task on the current tokio runtime.
    ///
    /// `on_relayout` receives the last width observed before the window
    /// elapsed.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F>(window: Duration, mut on_relayout: F) -> Self
    where
        F: FnMut(f32) + Send + 'static,
    {
        let (width_tx, mut width_rx) = watch::channel(None::<f32>);

        let task = tokio::spawn(async move {
            loop {
                // Idle until the first notification of a burst.
                if width_rx.changed().await.is_err() {
                    break;
                }

                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(window) => break,
                        changed = width_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            trace!("Relayout window restarted");
                        }
                    }
                }

                let latest = *width_rx.borrow_and_update();
                if let Some(width) = latest {
                    debug!(width, "Relayout after quiescence");
                    on_relayout(width);
                }
            }
        });

        Self {
            width_tx,
            task: Some(task),
            window,
        }
    }

    /// Records a new container width and restarts the quiescence window.
    pub fn notify(&self, width: f32) {
        self.width_tx.send_replace(Some(width));
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the debounce task; a pending relayout never runs.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Relayout debouncer stopped");
        }
    }
}

impl Drop for RelayoutDebouncer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<f32>>>, impl FnMut(f32) + Send + 'static) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        (fired, move |w| sink.lock().push(w))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_last_width() {
        let (fired, callback) = recorder();
        let debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);

        for width in [800.0, 812.0, 840.0, 901.0, 960.0] {
            debouncer.notify(width);
        }
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*fired.lock(), vec![960.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_restarts_window() {
        let (fired, callback) = recorder();
        let debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);

        debouncer.notify(100.0);
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.notify(200.0);
        tokio::time::sleep(Duration::from_millis(60)).await;

        // 120ms after the first notification, but only 60ms after the last.
        assert!(fired.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*fired.lock(), vec![200.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (fired, callback) = recorder();
        let debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);

        debouncer.notify(500.0);
        debouncer.notify(510.0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.notify(1200.0);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*fired.lock(), vec![510.0, 1200.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_relayout() {
        let (fired, callback) = recorder();
        let debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);

        debouncer.notify(640.0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(fired.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_task() {
        let (fired, callback) = recorder();
        let mut debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);
        assert!(debouncer.is_running());

        debouncer.notify(640.0);
        debouncer.shutdown();
        debouncer.notify(700.0);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(fired.lock().is_empty());
        assert!(!debouncer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_notification_no_relayout() {
        let (fired, callback) = recorder();
        let _debouncer = RelayoutDebouncer::spawn(DEFAULT_RELAYOUT_WINDOW, callback);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(fired.lock().is_empty());
    }
}
