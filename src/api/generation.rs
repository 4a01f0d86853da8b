//! Axum handlers for the study-aid generation routes.
//!
//! Every response carries `success`. Failures add `error` (a fixed label) and
//! `message` (what went wrong); validation failures also list `details`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::generate::{self, DEFAULT_QUESTIONS, GenerateError, QuestionType, QuizOptions};
use crate::query::ScoredChunk;
use crate::structured::QuizQuestion;

use super::ApiState;

fn default_count() -> usize { DEFAULT_QUESTIONS }

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QuizBody {
    study_material_id: String,
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default)]
    hits: Vec<ScoredChunk>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExamBody {
    space_id: String,
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default)]
    question_type: Option<String>,
    /// Minutes.
    #[serde(default)]
    exam_length: Option<f64>,
    /// Accepted for compatibility; the posted hits already define the scope.
    #[serde(default)]
    selected_material_ids: Vec<String>,
    #[serde(default)]
    hits: Vec<ScoredChunk>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MaterialBody {
    study_material_id: String,
    #[serde(default)]
    hits: Vec<ScoredChunk>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExamResponse {
    success: bool,
    questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    question_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exam_length: Option<f64>,
}

#[derive(Clone, Copy)]
enum Aid {
    Quiz,
    Exam,
    Flashcards,
    Summary,
}

impl Aid {
    fn name(self) -> &'static str {
        match self {
            Aid::Quiz => "quiz",
            Aid::Exam => "exam",
            Aid::Flashcards => "flashcards",
            Aid::Summary => "summary",
        }
    }

    fn failure_label(self) -> &'static str {
        match self {
            Aid::Quiz | Aid::Exam => "Failed to generate quiz",
            Aid::Flashcards => "Failed to generate flashcards",
            Aid::Summary => "Failed to generate summary",
        }
    }

    fn failure_message(self, err: &GenerateError) -> String {
        match (self, err) {
            (Aid::Quiz, GenerateError::NoContent) => {
                "Failed to generate quiz: The study material either has no content or hasn't been processed yet".into()
            }
            (Aid::Exam, GenerateError::NoContent) => {
                "Failed to generate quiz: The space/materials either have no content or the content hasn't been processed yet".into()
            }
            _ => format!("{}: {err}", self.failure_label()),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validation_error(details: Vec<String>) -> Response {
    let message = details.first().cloned().unwrap_or_default();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": "Validation error",
            "message": message,
            "details": details,
        })),
    )
        .into_response()
}

fn failure(aid: Aid, err: GenerateError) -> Response {
    if let GenerateError::Validation(details) = err {
        return validation_error(details);
    }
    warn!(aid = aid.name(), "generation failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": aid.failure_label(),
            "message": aid.failure_message(&err),
        })),
    )
        .into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /api/quiz/generate
pub(super) async fn quiz(
    State(state): State<ApiState>,
    payload: Result<Json<QuizBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return validation_error(vec![rejection.body_text()]),
    };
    info!(study_material_id = %body.study_material_id, count = body.count, "quiz requested");

    let options = QuizOptions::new(body.count);
    match generate::generate_quiz(&state.provider, &body.hits, &options).await {
        Ok(questions) => Json(json!({ "success": true, "questions": questions })).into_response(),
        Err(e) => failure(Aid::Quiz, e),
    }
}

/// POST /api/exam/generate: a quiz over every material in a space.
pub(super) async fn exam(
    State(state): State<ApiState>,
    payload: Result<Json<ExamBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return validation_error(vec![rejection.body_text()]),
    };
    info!(space_id = %body.space_id, count = body.count, "exam requested");
    debug!(selected = body.selected_material_ids.len(), "selected material ids ignored");

    let options = QuizOptions {
        question_type: QuestionType::from_label(body.question_type.as_deref()),
        exam_length_minutes: body.exam_length,
        ..QuizOptions::new(body.count)
    };
    match generate::generate_quiz(&state.provider, &body.hits, &options).await {
        Ok(questions) => Json(ExamResponse {
            success: true,
            questions,
            question_type: body.question_type,
            exam_length: body.exam_length,
        })
        .into_response(),
        Err(e) => failure(Aid::Exam, e),
    }
}

/// POST /api/flashcards/generate
pub(super) async fn flashcards(
    State(state): State<ApiState>,
    payload: Result<Json<MaterialBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return validation_error(vec![rejection.body_text()]),
    };
    info!(study_material_id = %body.study_material_id, "flashcards requested");

    match generate::generate_flashcards(&state.provider, &body.hits).await {
        Ok(flashcards) => Json(json!({ "success": true, "flashcards": flashcards })).into_response(),
        Err(e) => failure(Aid::Flashcards, e),
    }
}

/// POST /api/summary/generate
pub(super) async fn summary(
    State(state): State<ApiState>,
    payload: Result<Json<MaterialBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return validation_error(vec![rejection.body_text()]),
    };
    if body.study_material_id.is_empty() {
        return validation_error(vec!["Study material ID is required".into()]);
    }
    info!(study_material_id = %body.study_material_id, "summary requested");

    match generate::generate_summary(&state.provider, &body.hits).await {
        Ok(summary) => Json(json!({ "success": true, "summary": summary })).into_response(),
        Err(e) => failure(Aid::Summary, e),
    }
}
