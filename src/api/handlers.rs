//! Axum handlers for `/api/*` routes.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::classifier;
use crate::query::{self, QueryAnswer, QueryError, QueryRequest, ScoredChunk};

use super::{ApiState, GENERATION_TIMEOUT};

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ClassifyRequest {
    query: String,
}

#[derive(Deserialize)]
pub(super) struct QueryBody {
    #[serde(flatten)]
    request: QueryRequest,
    #[serde(default)]
    hits: Vec<ScoredChunk>,
}

/// Successful query response: the answer's fields alongside the envelope's.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryEnvelope<'a> {
    success: bool,
    query_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    space_id: Option<&'a str>,
    #[serde(flatten)]
    answer: &'a QueryAnswer,
}

#[derive(Clone, Copy)]
enum Scope {
    Document,
    Space,
}

impl Scope {
    fn query_type(self) -> &'static str {
        match self {
            Scope::Document => "document",
            Scope::Space => "space",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Scope::Document => "Failed to process query",
            Scope::Space => "Failed to process space query",
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validation_error(details: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Validation error", "details": details })),
    )
        .into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/classify — the profile a query would be answered with.
pub(super) async fn classify(payload: Result<Json<ClassifyRequest>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(req)) => Json(classifier::classify(&req.query)).into_response(),
        Err(rejection) => validation_error(vec![rejection.body_text()]),
    }
}

/// POST /api/query
pub(super) async fn query_document(
    State(state): State<ApiState>,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> Response {
    run_query(state, payload, Scope::Document).await
}

/// POST /api/query/space
pub(super) async fn query_space(
    State(state): State<ApiState>,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> Response {
    run_query(state, payload, Scope::Space).await
}

async fn run_query(
    state: ApiState,
    payload: Result<Json<QueryBody>, JsonRejection>,
    scope: Scope,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return validation_error(vec![rejection.body_text()]),
    };

    let (request, validated) = match scope {
        Scope::Document => {
            let validated = body.request.validate();
            (body.request, validated)
        }
        Scope::Space => {
            let request = body.request.space_scoped();
            let validated = request.validate_space();
            (request, validated)
        }
    };
    if let Err(QueryError::Validation(details)) = validated {
        return validation_error(details);
    }

    let outcome = tokio::time::timeout(
        GENERATION_TIMEOUT,
        query::answer_query(&state.provider, &request, &body.hits, &state.settings),
    )
    .await;

    match outcome {
        Ok(Ok(answer)) => {
            let envelope = QueryEnvelope {
                success: true,
                query_type: scope.query_type(),
                space_id: match scope {
                    Scope::Space => request.space_id.as_deref(),
                    Scope::Document => None,
                },
                answer: &answer,
            };
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Ok(Err(QueryError::Validation(details))) => validation_error(details),
        Ok(Err(e)) => {
            warn!(query_type = scope.query_type(), "query failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": scope.failure_message() })))
                .into_response()
        }
        Err(_) => {
            warn!(query_type = scope.query_type(), "query timed out");
            (StatusCode::GATEWAY_TIMEOUT, Json(json!({ "error": scope.failure_message() })))
                .into_response()
        }
    }
}
