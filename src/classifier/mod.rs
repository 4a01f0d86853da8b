//! Query classification.
//!
//! A free-text study question is mapped to one of eight fixed
//! [`ResponseProfile`]s, each pairing a system instruction with the
//! generation parameters used for the downstream completion call.
//!
//! Matching is plain substring containment on the lowercased query, checked
//! against the ordered [`RULES`] table. The first rule with any matching
//! keyword wins, so a query mentioning both "quiz" and "explain" resolves to
//! [`QueryKind::Quiz`]. No word-boundary check is made: "quiz" fires inside
//! "quizzes", and "cards" inside "postcards".
//!
//! Classification is total. A query that matches nothing (including the empty
//! string) gets [`QueryKind::Default`].

pub mod templates;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Output budget shared by every profile.
pub const MAX_OUTPUT_TOKENS: u32 = 5000;

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// The eight response shapes a query can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Quiz,
    Flashcards,
    Mindmap,
    Timeline,
    Summary,
    Explanation,
    Definition,
    Default,
}

impl QueryKind {
    /// Every kind, in rule order, with `Default` last.
    pub const ALL: [QueryKind; 8] = [
        QueryKind::Quiz,
        QueryKind::Flashcards,
        QueryKind::Mindmap,
        QueryKind::Timeline,
        QueryKind::Summary,
        QueryKind::Explanation,
        QueryKind::Definition,
        QueryKind::Default,
    ];

    /// Stable lowercase name, reported to clients as `promptType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Quiz => "quiz",
            QueryKind::Flashcards => "flashcards",
            QueryKind::Mindmap => "mindmap",
            QueryKind::Timeline => "timeline",
            QueryKind::Summary => "summary",
            QueryKind::Explanation => "explanation",
            QueryKind::Definition => "definition",
            QueryKind::Default => "default",
        }
    }

    /// Trigger keywords for this kind. Empty for `Default`.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            QueryKind::Quiz => QUIZ_KEYWORDS,
            QueryKind::Flashcards => FLASHCARD_KEYWORDS,
            QueryKind::Mindmap => MINDMAP_KEYWORDS,
            QueryKind::Timeline => TIMELINE_KEYWORDS,
            QueryKind::Summary => SUMMARY_KEYWORDS,
            QueryKind::Explanation => EXPLANATION_KEYWORDS,
            QueryKind::Definition => DEFINITION_KEYWORDS,
            QueryKind::Default => &[],
        }
    }

    /// Whether the generator is asked for JSON rather than plain text.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            QueryKind::Quiz | QueryKind::Flashcards | QueryKind::Mindmap | QueryKind::Timeline
        )
    }

    /// The constant profile for this kind.
    pub fn profile(&self) -> ResponseProfile {
        let (instruction_template, sampling_temperature) = match self {
            QueryKind::Quiz => (templates::QUIZ, 0.1),
            QueryKind::Flashcards => (templates::FLASHCARDS, 0.1),
            QueryKind::Mindmap => (templates::MINDMAP, 0.2),
            QueryKind::Timeline => (templates::TIMELINE, 0.1),
            QueryKind::Summary => (templates::SUMMARY, 0.2),
            QueryKind::Explanation => (templates::EXPLANATION, 0.3),
            QueryKind::Definition => (templates::DEFINITION, 0.1),
            QueryKind::Default => (templates::DEFAULT, 0.3),
        };
        ResponseProfile {
            kind: *self,
            instruction_template,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            sampling_temperature,
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Profile ───────────────────────────────────────────────────────────────────

/// Instruction template plus generation controls for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseProfile {
    #[serde(rename = "promptType")]
    pub kind: QueryKind,
    pub instruction_template: &'static str,
    pub max_output_tokens: u32,
    pub sampling_temperature: f32,
}

// ── Keyword tables ────────────────────────────────────────────────────────────

const QUIZ_KEYWORDS: &[&str] = &[
    "@quiz",
    "quiz",
    "test me",
    "questions",
    "multiple choice",
    "mcq",
    "create quiz",
    "generate quiz",
    "make quiz",
];

const FLASHCARD_KEYWORDS: &[&str] = &[
    "@flashcards",
    "flashcards",
    "flash cards",
    "cards",
    "create flashcards",
    "generate flashcards",
    "make flashcards",
    "study cards",
];

const MINDMAP_KEYWORDS: &[&str] = &[
    "@mindmap",
    "mindmap",
    "mind map",
    "concept map",
    "diagram",
    "visual map",
    "create mindmap",
    "generate mindmap",
    "make mindmap",
];

const TIMELINE_KEYWORDS: &[&str] = &[
    "@timeline",
    "timeline",
    "chronology",
    "chronological",
    "history",
    "sequence of events",
    "create timeline",
    "generate timeline",
    "make timeline",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "summarize",
    "summary",
    "key points",
    "main points",
    "overview",
    "outline",
    "briefly",
    "takeaways",
    "important takeaways",
    "key takeaways",
    "main takeaways",
    "highlights",
    "key insights",
    "important points",
    "main ideas",
];

const EXPLANATION_KEYWORDS: &[&str] = &[
    "explain",
    "how does",
    "how do",
    "why does",
    "why do",
    "what causes",
    "how works",
    "process of",
    "mechanism",
    "teach me",
    "tell me about",
    "what can you tell me",
    "about this book",
    "about the book",
];

const DEFINITION_KEYWORDS: &[&str] = &[
    "what is",
    "what are",
    "define",
    "definition",
    "meaning of",
    "means",
];

/// Rules in evaluation order. Reordering changes which kind wins for
/// queries that hit more than one keyword set.
pub const RULES: &[(QueryKind, &[&str])] = &[
    (QueryKind::Quiz, QUIZ_KEYWORDS),
    (QueryKind::Flashcards, FLASHCARD_KEYWORDS),
    (QueryKind::Mindmap, MINDMAP_KEYWORDS),
    (QueryKind::Timeline, TIMELINE_KEYWORDS),
    (QueryKind::Summary, SUMMARY_KEYWORDS),
    (QueryKind::Explanation, EXPLANATION_KEYWORDS),
    (QueryKind::Definition, DEFINITION_KEYWORDS),
];

// ── Classification ────────────────────────────────────────────────────────────

/// Classify `query` and return the kind together with the keyword that fired.
///
/// The keyword is `None` only for [`QueryKind::Default`].
pub fn classify_with_reason(query: &str) -> (QueryKind, Option<&'static str>) {
    let lower = query.to_lowercase();
    for (kind, keywords) in RULES {
        if let Some(keyword) = keywords.iter().find(|k| lower.contains(*k)) {
            return (*kind, Some(*keyword));
        }
    }
    (QueryKind::Default, None)
}

/// Classify `query` into one of the eight kinds.
pub fn classify_kind(query: &str) -> QueryKind {
    classify_with_reason(query).0
}

/// Select the response profile for `query`. Never fails.
pub fn classify(query: &str) -> ResponseProfile {
    let (kind, keyword) = classify_with_reason(query);
    debug!(kind = %kind, keyword = ?keyword, query_len = query.len(), "query classified");
    kind.profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_fall_back_to_default() {
        assert_eq!(classify("").kind, QueryKind::Default);
        assert_eq!(classify("   ").kind, QueryKind::Default);
        assert_eq!(classify("\t\n").kind, QueryKind::Default);
        assert_eq!(classify("banana").kind, QueryKind::Default);
    }

    #[test]
    fn quiz_beats_explanation() {
        assert_eq!(classify("quiz me and also explain this").kind, QueryKind::Quiz);
    }

    #[test]
    fn keyword_inside_word_still_matches() {
        assert_eq!(classify("I have some questions").kind, QueryKind::Quiz);
        assert_eq!(classify("any pop quizzes?").kind, QueryKind::Quiz);
        assert_eq!(classify("send me postcards").kind, QueryKind::Flashcards);
    }

    #[test]
    fn uppercase_input_is_lowered() {
        assert_eq!(classify("MAKE FLASHCARDS").kind, QueryKind::Flashcards);
        assert_eq!(classify("Create Timeline").kind, QueryKind::Timeline);
    }

    #[test]
    fn reason_reports_first_matching_keyword() {
        assert_eq!(classify_with_reason("@quiz please"), (QueryKind::Quiz, Some("@quiz")));
        assert_eq!(classify_with_reason("what is osmosis"), (QueryKind::Definition, Some("what is")));
        assert_eq!(classify_with_reason("hello"), (QueryKind::Default, None));
    }

    #[test]
    fn definition_profile_is_strict() {
        let p = classify("define entropy");
        assert_eq!(p.kind, QueryKind::Definition);
        assert_eq!(p.sampling_temperature, 0.1);
        assert!(p.instruction_template.contains("providing clear definitions"));
    }

    #[test]
    fn all_profiles_share_token_budget() {
        for kind in QueryKind::ALL {
            assert_eq!(kind.profile().max_output_tokens, 5000, "{kind}");
        }
    }

    #[test]
    fn temperatures_match_output_strictness() {
        let t = |k: QueryKind| k.profile().sampling_temperature;
        assert_eq!(t(QueryKind::Quiz), 0.1);
        assert_eq!(t(QueryKind::Flashcards), 0.1);
        assert_eq!(t(QueryKind::Mindmap), 0.2);
        assert_eq!(t(QueryKind::Timeline), 0.1);
        assert_eq!(t(QueryKind::Summary), 0.2);
        assert_eq!(t(QueryKind::Explanation), 0.3);
        assert_eq!(t(QueryKind::Definition), 0.1);
        assert_eq!(t(QueryKind::Default), 0.3);
    }

    #[test]
    fn rules_follow_all_order() {
        let ordered: Vec<QueryKind> = RULES.iter().map(|(k, _)| *k).collect();
        assert_eq!(ordered, QueryKind::ALL[..7].to_vec());
        for (kind, keywords) in RULES {
            assert_eq!(kind.keywords(), *keywords);
        }
    }

    #[test]
    fn every_keyword_is_lowercase() {
        for (_, keywords) in RULES {
            for k in *keywords {
                assert_eq!(*k, k.to_lowercase());
            }
        }
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&QueryKind::Flashcards).unwrap();
        assert_eq!(json, "\"flashcards\"");
        let p = serde_json::to_value(classify("mcq")).unwrap();
        assert_eq!(p["promptType"], "quiz");
        assert_eq!(p["maxOutputTokens"], 5000);
    }

    #[test]
    fn structured_kinds() {
        assert!(QueryKind::Mindmap.is_structured());
        assert!(!QueryKind::Summary.is_structured());
        assert!(!QueryKind::Default.is_structured());
    }
}
