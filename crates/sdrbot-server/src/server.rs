use crate::handlers;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::Duration;
use sdrbot_llm::LlmGateway;
use sdrbot_session::{SessionLocks, SessionStore};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Shared application state, injected into every handler.
pub struct AppState {
    /// The one LLM gateway all routes call through.
    pub llm: Arc<dyn LlmGateway>,
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
    /// Per-session exclusion for the read-LLM-write sequences.
    pub locks: Arc<SessionLocks>,
}

impl AppState {
    /// Bundles the injected collaborators with a fresh lock table.
    pub fn new(llm: Arc<dyn LlmGateway>, sessions: Arc<dyn SessionStore>) -> Arc<Self> {
        Arc::new(Self {
            llm,
            sessions,
            locks: Arc::new(SessionLocks::new()),
        })
    }
}

/// The qualification API server.
pub struct ApiServer;

impl ApiServer {
    /// Assembles the router over the shared state.
    pub fn build(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/start_conversation", get(handlers::start_conversation))
            .route("/ask_question", post(handlers::ask_question))
            .route("/get_summary", post(handlers::get_summary))
            .route("/capture_lead", post(handlers::capture_lead))
            .with_state(state)
    }
}

async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({"status": "ok", "service": "sdrbot"}))
}

/// Spawns the background sweep that expires idle sessions.
///
/// Every `period`, sessions idle longer than `ttl` are removed and the lock
/// table is reconciled against the surviving session ids. Reconciling (rather
/// than removing only the expired ids) also reclaims lock entries created for
/// ids that never became sessions — unknown-session lookups and starts whose
/// LLM call failed. The sweep runs for the lifetime of the process.
pub fn spawn_expiry_sweep(
    sessions: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
    ttl: Duration,
    period: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately; skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            let cutoff = chrono::Utc::now() - ttl;
            match sessions.remove_idle_since(cutoff).await {
                Ok(expired) => {
                    if !expired.is_empty() {
                        info!(count = expired.len(), "expired idle sessions");
                    }
                }
                Err(e) => warn!(error = %e, "session expiry sweep failed"),
            }
            match sessions.list().await {
                Ok(live) => locks.prune_orphans(&live.into_iter().collect()).await,
                Err(e) => warn!(error = %e, "lock table reconciliation failed"),
            }
        }
    })
}
