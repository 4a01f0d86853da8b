//! Typed parsing of the JSON the generator is instructed to emit.
//!
//! Structured kinds follow their instruction template:
//!
//! ```text
//! quiz        [ {"type":"quiz"}, {question, options, answer, hint, explanation}, … ]
//! flashcards  [ {"type":"flashcards"}, {question, answer, hint}, … ]
//! timeline    [ {"type":"timeline"}, {year, event, note}, … ]
//! mindmap     { "type":"mindmap", "nodes":[…], "edges":[…] }
//! ```
//!
//! Models do not always comply, so the payload is dug out of markdown fences
//! or surrounding prose, and a JSON document that is itself a JSON string is
//! decoded twice.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::classifier::QueryKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON {expected} found in {kind} output")]
    NotFound { kind: QueryKind, expected: &'static str },
    #[error("malformed {kind} output: {source}")]
    Malformed {
        kind: QueryKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} output contained no items")]
    Empty { kind: QueryKind },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Free-form date label ("1789", "Late Cretaceous").
    pub year: String,
    pub event: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mindmap {
    pub nodes: Vec<MindmapNode>,
    #[serde(default)]
    pub edges: Vec<MindmapEdge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Whole-material summary. `difficulty`, `estimated_reading_time` and
/// `sections` are overwritten by the summary pipeline, so the model may omit
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
    pub title: String,
    pub main_summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub important_concepts: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Minutes.
    #[serde(default)]
    pub estimated_reading_time: u64,
    #[serde(default)]
    pub sections: Vec<SectionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum GeneratedOutput {
    Quiz(Vec<QuizQuestion>),
    Flashcards(Vec<Flashcard>),
    Mindmap(Mindmap),
    Timeline(Vec<TimelineEvent>),
    Text(String),
}

/// Parse generator output produced under `kind`'s profile.
///
/// Free-text kinds never fail and yield [`GeneratedOutput::Text`].
pub fn parse_generated(kind: QueryKind, raw: &str) -> Result<GeneratedOutput, ParseError> {
    match kind {
        QueryKind::Quiz => parse_quiz(raw).map(GeneratedOutput::Quiz),
        QueryKind::Flashcards => parse_flashcards(raw).map(GeneratedOutput::Flashcards),
        QueryKind::Timeline => parse_items(kind, raw).map(GeneratedOutput::Timeline),
        QueryKind::Mindmap => parse_mindmap(raw).map(GeneratedOutput::Mindmap),
        QueryKind::Summary | QueryKind::Explanation | QueryKind::Definition | QueryKind::Default => {
            Ok(GeneratedOutput::Text(raw.trim().to_string()))
        }
    }
}

pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    parse_items(QueryKind::Quiz, raw)
}

pub fn parse_flashcards(raw: &str) -> Result<Vec<Flashcard>, ParseError> {
    parse_items(QueryKind::Flashcards, raw)
}

/// Array kinds: skip `{"type": …}` marker elements, decode the rest.
fn parse_items<T: DeserializeOwned>(kind: QueryKind, raw: &str) -> Result<Vec<T>, ParseError> {
    let value = extract_json(raw, '[', ']')
        .ok_or(ParseError::NotFound { kind, expected: "array" })
        .and_then(|v| decode_value(kind, v))?;

    let elements = match value {
        Value::Array(elements) => elements,
        // A lone object is one item.
        other @ Value::Object(_) => vec![other],
        _ => return Err(ParseError::NotFound { kind, expected: "array" }),
    };

    let items = elements
        .into_iter()
        .filter(|el| el.get("type").is_none())
        .map(|el| serde_json::from_value(el).map_err(|source| ParseError::Malformed { kind, source }))
        .collect::<Result<Vec<T>, _>>()?;

    if items.is_empty() {
        return Err(ParseError::Empty { kind });
    }
    Ok(items)
}

/// Parse a whole-material summary object. A `{"summary": {...}}` wrapper is
/// accepted too.
pub fn parse_summary(raw: &str) -> Result<StudySummary, ParseError> {
    parse_object(QueryKind::Summary, raw, "summary")
}

/// Parse one section summary, optionally wrapped as `{"section": {...}}`.
pub fn parse_section(raw: &str) -> Result<SectionSummary, ParseError> {
    parse_object(QueryKind::Summary, raw, "section")
}

fn parse_object<T: DeserializeOwned>(
    kind: QueryKind,
    raw: &str,
    wrapper: &str,
) -> Result<T, ParseError> {
    let mut value = extract_json(raw, '{', '}')
        .ok_or(ParseError::NotFound { kind, expected: "object" })
        .and_then(|v| decode_value(kind, v))?;
    if let Some(inner) = value.get_mut(wrapper).filter(|v| v.is_object()).map(Value::take) {
        value = inner;
    }
    serde_json::from_value(value).map_err(|source| ParseError::Malformed { kind, source })
}

fn parse_mindmap(raw: &str) -> Result<Mindmap, ParseError> {
    let kind = QueryKind::Mindmap;
    let map: Mindmap = parse_object(kind, raw, "mindmap")?;
    if map.nodes.is_empty() {
        return Err(ParseError::Empty { kind });
    }
    Ok(map)
}

/// Parse a JSON slice, unwrapping one level of string encoding.
fn decode_value(kind: QueryKind, slice: &str) -> Result<Value, ParseError> {
    let value: Value =
        serde_json::from_str(slice).map_err(|source| ParseError::Malformed { kind, source })?;
    match value {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|source| ParseError::Malformed { kind, source })
        }
        other => Ok(other),
    }
}

/// Locate the JSON payload inside `raw`.
///
/// A whole-document JSON string is returned as is. Otherwise the text is
/// sliced from the first `open` to the last `close`, after stripping an
/// optional markdown code fence.
fn extract_json(raw: &str, open: char, close: char) -> Option<&str> {
    let body = strip_fence(raw.trim());
    if body.starts_with('"') && body.ends_with('"') && body.len() >= 2 {
        return Some(body);
    }
    let start = body.find(open)?;
    let end = body.rfind(close)?;
    (end > start).then(|| &body[start..=end])
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line.
    let rest = rest.find('\n').map_or("", |i| &rest[i + 1..]);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
