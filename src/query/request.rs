//! Inbound query shape, validation, and the vector-store filter derived from it.

use serde::{Deserialize, Serialize};

use super::QueryError;

pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 20;

fn default_top_k() -> u32 { 5 }
fn default_true() -> bool { true }

/// A question against one study material, or every material in a space.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub study_material_id: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// When false, sources are returned without their owning ids.
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            study_material_id: None,
            space_id: None,
            top_k: default_top_k(),
            include_metadata: true,
        }
    }

    pub fn with_study_material(mut self, id: impl Into<String>) -> Self {
        self.study_material_id = Some(id.into());
        self
    }

    pub fn with_space(mut self, id: impl Into<String>) -> Self {
        self.space_id = Some(id.into());
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Narrow to a whole-space query. Any study material id is dropped, so
    /// the search covers every material in the space.
    pub fn space_scoped(mut self) -> Self {
        self.study_material_id = None;
        self
    }

    /// Check a single-document query. Collects every problem, not just the first.
    pub fn validate(&self) -> Result<(), QueryError> {
        let issues = self.issues();
        if issues.is_empty() { Ok(()) } else { Err(QueryError::Validation(issues)) }
    }

    /// As [`validate`](Self::validate), and additionally require `spaceId`.
    pub fn validate_space(&self) -> Result<(), QueryError> {
        let mut issues = self.issues();
        if self.space_id.is_none() {
            issues.push("spaceId: required".to_string());
        }
        if issues.is_empty() { Ok(()) } else { Err(QueryError::Validation(issues)) }
    }

    fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.query.is_empty() {
            issues.push("query: must contain at least 1 character".to_string());
        }
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&self.top_k) {
            issues.push(format!(
                "topK: must be between {MIN_TOP_K} and {MAX_TOP_K}, got {}",
                self.top_k
            ));
        }
        issues
    }
}

// ── Retrieval filter ──────────────────────────────────────────────────────────

/// Metadata filter in the vector store's `must` form:
///
/// ```json
/// { "must": [ { "key": "metadata.spaceId", "match": { "value": "s1" } } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalFilter {
    pub must: Vec<FieldCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub matches: MatchValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchValue {
    pub value: String,
}

impl RetrievalFilter {
    /// Conditions for every id present on `request`, study material first.
    /// `None` when the request is unscoped.
    pub fn for_request(request: &QueryRequest) -> Option<Self> {
        let must: Vec<FieldCondition> = [
            ("metadata.studyMaterialId", &request.study_material_id),
            ("metadata.spaceId", &request.space_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|v| FieldCondition {
                key: key.to_string(),
                matches: MatchValue { value: v.clone() },
            })
        })
        .collect();

        if must.is_empty() { None } else { Some(Self { must }) }
    }
}
