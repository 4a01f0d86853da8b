//! Turning scored retrieval hits into generator context.

use serde::Deserialize;

/// One retrieval hit, as returned by the caller's vector store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredChunk {
    #[serde(alias = "pageContent")]
    pub text: String,
    pub score: f64,
    #[serde(default)]
    pub chunk_id: Option<String>,
    #[serde(default)]
    pub study_material_id: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    /// Position of the chunk within its source document.
    #[serde(default)]
    pub chunk_index: Option<u64>,
}

impl ScoredChunk {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
            chunk_id: None,
            study_material_id: None,
            space_id: None,
            chunk_index: None,
        }
    }
}

/// Join hit texts into one context block.
///
/// The first hit is always kept, whatever its score, so a weak but
/// best-available match still reaches the generator. Later hits need a score
/// strictly above `min_score`. Empty texts are dropped.
pub fn assemble_context(hits: &[ScoredChunk], min_score: f64) -> String {
    hits.iter()
        .enumerate()
        .filter(|(i, hit)| *i == 0 || hit.score > min_score)
        .map(|(_, hit)| hit.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The user turn sent alongside the profile's system instruction.
pub fn build_user_message(context: &str, query: &str) -> String {
    format!("Study Material Content:\n\n{context}\n\nUser Question: {query}")
}

/// First `max_chars` characters of `text` followed by `...`.
///
/// Counts `char`s, so multi-byte text is never split mid code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_hit_kept_below_threshold() {
        let hits = vec![ScoredChunk::new("weak but best", 0.1)];
        assert_eq!(assemble_context(&hits, 0.5), "weak but best");
    }

    #[test]
    fn later_hits_need_score_above_threshold() {
        let hits = vec![
            ScoredChunk::new("a", 0.9),
            ScoredChunk::new("b", 0.5),
            ScoredChunk::new("c", 0.51),
            ScoredChunk::new("d", 0.2),
        ];
        assert_eq!(assemble_context(&hits, 0.5), "a\n\nc");
    }

    #[test]
    fn empty_texts_are_dropped() {
        let hits = vec![ScoredChunk::new("", 0.9), ScoredChunk::new("b", 0.8)];
        assert_eq!(assemble_context(&hits, 0.5), "b");
    }

    #[test]
    fn no_hits_no_context() {
        assert_eq!(assemble_context(&[], 0.5), "");
    }

    #[test]
    fn user_message_layout() {
        assert_eq!(
            build_user_message("ctx", "why?"),
            "Study Material Content:\n\nctx\n\nUser Question: why?"
        );
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("hi", 200), "hi...");
    }

    #[test]
    fn chunk_accepts_page_content_alias() {
        let c: ScoredChunk =
            serde_json::from_str(r#"{"pageContent":"x","score":0.4,"chunkId":"c1"}"#).unwrap();
        assert_eq!(c.text, "x");
        assert_eq!(c.chunk_id.as_deref(), Some("c1"));
        assert_eq!(c.chunk_index, None);
    }

    #[test]
    fn chunk_reads_chunk_index() {
        let c: ScoredChunk =
            serde_json::from_str(r#"{"text":"x","score":0.4,"chunkIndex":7}"#).unwrap();
        assert_eq!(c.chunk_index, Some(7));
    }
}
