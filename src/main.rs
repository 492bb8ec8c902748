mod config;
mod error;
mod llm;
mod mindmap;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    // A missing .env file is the normal production case.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();

    // Initialize LLM client (non-fatal: generation disabled if config missing).
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured — generation disabled");
            None
        }
    };

    let history = services::history::HistoryStore::load(&config.history_path)
        .await
        .expect("history file unreadable");
    tracing::info!(items = history.len(), path = %config.history_path.display(), "history loaded");

    let port = config.port;
    let state = state::AppState::new(config, llm, history);

    // Spawn background history persistence task.
    let _persistence = services::persistence::spawn_persistence_task(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "mindmap listening");
    axum::serve(listener, app).await.expect("server failed");
}
