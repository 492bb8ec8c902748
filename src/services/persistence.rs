//! Persistence service — background flush of the generation history.
//!
//! DESIGN
//! ======
//! A background task flushes the history when dirty, then sleeps for the
//! configured interval before the next cycle. Writes go to `<path>.tmp` and
//! are renamed into place so a crash mid-write leaves the previous file.
//!
//! ERROR HANDLING
//! ==============
//! The dirty version is acked only after a successful write. A failed write
//! is logged and retried on the next cycle; it never stops the task.

use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::services::history::{HistoryError, HistoryItem};
use crate::state::AppState;

/// Read saved items. `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`HistoryError::Io`] on read failure and
/// [`HistoryError::Corrupt`] when the content is not an item list.
pub async fn read_items(path: &Path) -> Result<Option<Vec<HistoryItem>>, HistoryError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Write `items` to `path` atomically, creating the parent directory.
///
/// # Errors
///
/// Returns [`HistoryError::Io`] if the directory, temp file or rename fails.
pub async fn save(path: &Path, items: &[HistoryItem]) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(items)?;
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Spawn the background persistence task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState) -> JoinHandle<()> {
    let interval = state.config.history_flush_interval;
    #[allow(clippy::cast_possible_truncation)]
    let flush_interval_ms = interval.as_millis() as u64;
    info!(flush_interval_ms, path = %state.config.history_path.display(), "history persistence flush configured");
    tokio::spawn(async move {
        loop {
            flush_history(&state).await;
            tokio::time::sleep(interval).await;
        }
    })
}

/// Flush once if dirty. Returns true when a write succeeded.
pub(crate) async fn flush_history(state: &AppState) -> bool {
    // PHASE: SNAPSHOT UNDER LOCK
    // WHY: clone under the read lock, then perform I/O lock-free.
    let (version, items) = {
        let history = state.history.read().await;
        if !history.is_dirty() {
            return false;
        }
        history.snapshot()
    };

    // PHASE: WRITE + ACK VERSION
    // WHY: a mutation during the write bumps the version past what we ack.
    match save(&state.config.history_path, &items).await {
        Ok(()) => {
            state.history.write().await.mark_persisted(version);
            debug!(version, count = items.len(), "history flushed");
            true
        }
        Err(e) => {
            error!(error = %e, count = items.len(), "history flush failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
