use std::path::Path;
use std::sync::Arc;

use join_core::JoinResult;
use notify::{RecursiveMode, Watcher};
use tokio::sync::Mutex;

use crate::json_file_store::JsonFileStore;

/// Watches the board file for writes by other processes and turns each one
/// into a full-collection push on the store's subscription. The watcher runs
/// in a background task; the notify callback itself stays synchronous and
/// only queues a signal.
pub struct StoreWatcher {
    task_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl StoreWatcher {
    pub fn new() -> Self {
        Self {
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn start(&self, store: JsonFileStore) -> JoinResult<()> {
        // Canonicalize so the path matches what the OS reports in events.
        let canonical = tokio::fs::canonicalize(store.path()).await?;

        let handle = tokio::spawn(async move {
            let parent = canonical
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let watch_path = canonical;
            let (signal_tx, mut signal_rx) = tokio::sync::mpsc::unbounded_channel();

            let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                match res {
                    Ok(event) => {
                        // Atomic writes land as a rename, so accept any
                        // modify-class event on our file.
                        if event.kind.is_modify() && event.paths.iter().any(|p| p == &watch_path) {
                            let _ = signal_tx.send(());
                        }
                    }
                    Err(e) => {
                        tracing::warn!("file watcher error: {}", e);
                    }
                }
            });

            match watcher {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(&parent, RecursiveMode::NonRecursive) {
                        tracing::error!("failed to watch {}: {}", parent.display(), e);
                        return;
                    }
                    tracing::info!("watching board file directory {}", parent.display());
                    while signal_rx.recv().await.is_some() {
                        if let Err(e) = store.reload_and_broadcast().await {
                            tracing::warn!("reload after external change failed: {}", e);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("failed to create watcher: {}", e);
                }
            }
        });

        let mut guard = self.task_handle.lock().await;
        *guard = Some(handle);
        Ok(())
    }

    pub async fn stop(&self) {
        let mut guard = self.task_handle.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
            tracing::info!("stopped watching board file");
        }
    }
}

impl Default for StoreWatcher {
    fn default() -> Self {
        Self::new()
    }
}
