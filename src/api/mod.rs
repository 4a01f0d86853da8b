//! HTTP API over the classifier, the query pipeline and the study-aid generators.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health
//! POST /api/classify      { query }
//! POST /api/query         QueryRequest + { hits: [ScoredChunk] }
//! POST /api/query/space   same, spaceId required
//!
//! POST /api/quiz/generate        { studyMaterialId, count?, hits }
//! POST /api/exam/generate        { spaceId, count?, questionType?, examLength?, hits }
//! POST /api/flashcards/generate  { studyMaterialId, hits }
//! POST /api/summary/generate     { studyMaterialId, hits }
//! ```
//!
//! Retrieval runs in the caller, which posts its scored hits alongside the
//! request. Shutdown is driven by a [`CancellationToken`] wired to axum's
//! graceful shutdown.

mod generation;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::{get, post}};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RetrievalSettings;
use crate::error::AppError;
use crate::llm::LlmProvider;

/// Upper bound on answering one query, generation included. The generation
/// routes make several provider calls and rely on the client timeout instead.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — the provider shares its HTTP client and settings are
/// reference-counted.
#[derive(Clone)]
pub struct ApiState {
    pub provider: LlmProvider,
    pub settings: Arc<RetrievalSettings>,
}

impl ApiState {
    pub fn new(provider: LlmProvider, settings: RetrievalSettings) -> Self {
        Self { provider, settings: Arc::new(settings) }
    }
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health",      get(handlers::health))
        .route("/api/classify",    post(handlers::classify))
        .route("/api/query",       post(handlers::query_document))
        .route("/api/query/space", post(handlers::query_space))
        .route("/api/quiz/generate",       post(generation::quiz))
        .route("/api/exam/generate",       post(generation::exam))
        .route("/api/flashcards/generate", post(generation::flashcards))
        .route("/api/summary/generate",    post(generation::summary))
        .with_state(state)
}

/// Bind `bind_addr` and serve until `shutdown` is cancelled.
pub async fn serve(
    bind_addr: &str,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, "http api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("axum server error: {e}")))?;

    info!("http api shut down");
    Ok(())
}
