//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the typed config, the optional LLM client, the reply decoder
//! and the bounded generation history. The history is flushed to disk by
//! the persistence task; handlers only touch the in-memory copy.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::llm::LlmChat;
use crate::mindmap::{FencedJsonDecoder, ResponseDecoder};
use crate::services::history::HistoryStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub decoder: Arc<dyn ResponseDecoder>,
    pub history: Arc<RwLock<HistoryStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, llm: Option<Arc<dyn LlmChat>>, history: HistoryStore) -> Self {
        Self {
            config: Arc::new(config),
            llm,
            decoder: Arc::new(FencedJsonDecoder),
            history: Arc::new(RwLock::new(history)),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
