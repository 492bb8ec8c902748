//! History service — bounded list of past generations.
//!
//! DESIGN
//! ======
//! Most recent first, capped at `HISTORY_CAP`; recording past the cap drops
//! the oldest entry. Every mutation bumps `version`. The persistence task
//! snapshots `(version, items)`, writes outside the lock, then acks the
//! version it wrote so a mutation racing the write stays dirty.

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::error::ErrorCode;
use crate::mindmap::MindMapNode;
use crate::services::persistence;

pub const HISTORY_CAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub topic: String,
    pub depth: u8,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub data: MindMapNode,
}

impl HistoryItem {
    #[must_use]
    pub fn new(topic: &str, depth: u8, data: MindMapNode) -> Self {
        Self {
            id: format!("history-{}", uuid::Uuid::new_v4()),
            topic: topic.to_owned(),
            depth,
            timestamp: now_ms(),
            data,
        }
    }
}

fn now_ms() -> i64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history item not found: {0}")]
    NotFound(String),
    #[error("history io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl ErrorCode for HistoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_HISTORY_NOT_FOUND",
            Self::Io(_) => "E_HISTORY_IO",
            Self::Corrupt(_) => "E_HISTORY_CORRUPT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    version: u64,
    persisted_version: u64,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously saved items. It starts clean unless
    /// items past the cap were dropped, so the trimmed list gets written back.
    #[must_use]
    pub fn from_items(mut items: Vec<HistoryItem>) -> Self {
        let dropped = items.len().saturating_sub(HISTORY_CAP);
        items.truncate(HISTORY_CAP);
        let mut store = Self { items, version: 0, persisted_version: 0 };
        if dropped > 0 {
            info!(dropped, "history over cap; oldest items dropped");
            store.touch();
        }
        store
    }

    /// Load the store from `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the file cannot be read and
    /// [`HistoryError::Corrupt`] if it is not a valid item list.
    pub async fn load(path: &Path) -> Result<Self, HistoryError> {
        let Some(items) = persistence::read_items(path).await? else {
            info!(path = %path.display(), "no history file; starting empty");
            return Ok(Self::new());
        };
        Ok(Self::from_items(items))
    }

    /// Record a finished generation at the front, evicting past the cap.
    pub fn record(&mut self, topic: &str, depth: u8, data: MindMapNode) -> HistoryItem {
        let item = HistoryItem::new(topic, depth, data);
        self.insert(item.clone());
        item
    }

    pub fn insert(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
        self.touch();
    }

    #[must_use]
    pub fn list(&self) -> &[HistoryItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Remove one item. Returns false when `id` is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Drop every item. Returns how many were removed; clearing an empty
    /// store is not a mutation.
    pub fn clear(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let count = self.items.len();
        self.items.clear();
        self.touch();
        count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // PHASE: PERSISTENCE HANDSHAKE
    // WHY: the writer never holds the lock during file I/O.

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.version != self.persisted_version
    }

    #[must_use]
    pub fn snapshot(&self) -> (u64, Vec<HistoryItem>) {
        (self.version, self.items.clone())
    }

    /// Ack a successful write of `version`. Stale acks are ignored.
    pub fn mark_persisted(&mut self, version: u64) {
        if version > self.persisted_version {
            self.persisted_version = version;
        }
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
