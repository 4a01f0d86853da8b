//! Question answering over retrieved study material.
//!
//! The vector search itself happens upstream; this module takes its scored
//! hits and does the rest:
//!
//! ```text
//! hits ─▶ assemble_context ─▶ classify(query) ─▶ ChatRequest ─▶ LlmProvider
//!                                                                   │
//!                                   QueryAnswer { answer, sources } ◀┘
//! ```
//!
//! When no usable context survives assembly the provider is not called and a
//! fixed "nothing found" answer is returned instead.

mod context;
mod request;

pub use context::{ScoredChunk, assemble_context, build_user_message, preview};
pub use request::{FieldCondition, MatchValue, QueryRequest, RetrievalFilter};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::{self, QueryKind};
use crate::config::RetrievalSettings;
use crate::llm::{ChatRequest, LlmProvider, LlmUsage, ProviderError};

pub const NO_CONTEXT_ANSWER: &str =
    "I couldn't find relevant information in the document to answer your question.";

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("generation failed: {0}")]
    Generation(#[from] ProviderError),
}

// ── Answer ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub score: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDebug {
    pub total_results: usize,
    pub scores: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RetrievalFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<Source>,
    /// Score of the best hit, or 0 when nothing was retrieved.
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<QueryKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
    pub debug: QueryDebug,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Answer `request` from `hits`, which must be ordered best-first.
///
/// Only the first `top_k` hits are considered.
pub async fn answer_query(
    provider: &LlmProvider,
    request: &QueryRequest,
    hits: &[ScoredChunk],
    settings: &RetrievalSettings,
) -> Result<QueryAnswer, QueryError> {
    request.validate()?;

    let hits = &hits[..hits.len().min(request.top_k as usize)];
    let scores: Vec<f64> = hits.iter().map(|h| h.score).collect();
    let filter = RetrievalFilter::for_request(request);

    let context = assemble_context(hits, settings.min_score);
    debug!(hits = hits.len(), context_chars = context.chars().count(), "context assembled");

    if context.trim().is_empty() {
        warn!(hits = hits.len(), "no usable context for query");
        return Ok(QueryAnswer {
            answer: NO_CONTEXT_ANSWER.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
            context: None,
            prompt_type: None,
            usage: None,
            debug: QueryDebug {
                total_results: hits.len(),
                scores,
                context_length: None,
                filter,
            },
        });
    }

    let profile = classifier::classify(&request.query);
    let chat = ChatRequest::from_profile(&profile, build_user_message(&context, &request.query));

    info!(
        prompt_type = %profile.kind,
        provider = provider.name(),
        hits = hits.len(),
        "generating answer"
    );
    let response = provider.complete(&chat).await?;

    let sources = hits
        .iter()
        .map(|hit| to_source(hit, request.include_metadata, settings.source_preview_chars))
        .collect();

    Ok(QueryAnswer {
        answer: response.text,
        sources,
        confidence: scores.first().copied().unwrap_or(0.0),
        context: Some(preview(&context, settings.context_preview_chars)),
        prompt_type: Some(profile.kind),
        usage: response.usage,
        debug: QueryDebug {
            total_results: hits.len(),
            scores,
            context_length: Some(context.chars().count()),
            filter,
        },
    })
}

fn to_source(hit: &ScoredChunk, include_metadata: bool, preview_chars: usize) -> Source {
    let meta = |v: &Option<String>| if include_metadata { v.clone() } else { None };
    Source {
        chunk_id: meta(&hit.chunk_id),
        study_material_id: meta(&hit.study_material_id),
        space_id: meta(&hit.space_id),
        score: hit.score,
        text: preview(&hit.text, preview_chars),
    }
}
