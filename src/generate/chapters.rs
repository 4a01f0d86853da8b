//! Grouping a material's chunks into chapters and sections, plus the cheap
//! text statistics attached to summaries.

use crate::query::ScoredChunk;
use crate::structured::Difficulty;

/// Consecutive chunks that make up one quiz chapter.
pub const CHUNKS_PER_CHAPTER: usize = 5;
/// Upper bound on one summary section, in chars.
pub const MAX_SECTION_CHARS: usize = 10_000;
pub const WORDS_PER_MINUTE: u64 = 200;

const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "methodology",
    "implementation",
    "infrastructure",
    "optimization",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// "Chapter 1", "Chapter 2", ...
    pub title: String,
    pub content: String,
    pub start_index: Option<u64>,
    pub end_index: Option<u64>,
}

/// Hits sorted by `chunk_index`. The sort is stable and unindexed hits come
/// first, in the order given.
pub fn in_document_order(hits: &[ScoredChunk]) -> Vec<&ScoredChunk> {
    let mut ordered: Vec<&ScoredChunk> = hits.iter().collect();
    ordered.sort_by_key(|hit| hit.chunk_index);
    ordered
}

/// Split hits, in document order, into chapters of [`CHUNKS_PER_CHAPTER`].
pub fn organize_into_chapters(hits: &[ScoredChunk]) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();
    for (i, hit) in in_document_order(hits).into_iter().enumerate() {
        if i % CHUNKS_PER_CHAPTER == 0 {
            chapters.push(Chapter {
                title: format!("Chapter {}", chapters.len() + 1),
                content: hit.text.clone(),
                start_index: hit.chunk_index,
                end_index: hit.chunk_index,
            });
        } else if let Some(chapter) = chapters.last_mut() {
            chapter.content.push_str("\n\n");
            chapter.content.push_str(&hit.text);
            chapter.end_index = hit.chunk_index;
        }
    }
    chapters
}

/// Cut `content` into sections of at most [`MAX_SECTION_CHARS`] along
/// paragraph breaks. A single paragraph longer than the limit becomes its own
/// oversized section.
pub fn create_sections(content: &str) -> Vec<String> {
    if content.chars().count() <= MAX_SECTION_CHARS {
        return vec![content.to_string()];
    }

    let mut sections = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for paragraph in content.split("\n\n") {
        let paragraph_chars = paragraph.chars().count();
        if current_chars + paragraph_chars > MAX_SECTION_CHARS && current_chars > 0 {
            sections.push(current.trim().to_string());
            current = paragraph.to_string();
            current_chars = paragraph_chars;
        } else {
            if !current.is_empty() {
                current.push_str("\n\n");
                current_chars += 2;
            }
            current.push_str(paragraph);
            current_chars += paragraph_chars;
        }
    }

    if !current.trim().is_empty() {
        sections.push(current.trim().to_string());
    }
    sections
}

/// Space-separated word count; empty text counts as one word.
pub fn word_count(text: &str) -> u64 {
    text.split(' ').count() as u64
}

pub fn reading_time_minutes(words: u64) -> u64 {
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Rough reading level from sentence length, long words and a handful of
/// technical terms.
pub fn assess_difficulty(content: &str) -> Difficulty {
    let sentences = content
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let avg_sentence_words = word_count(content) as f64 / sentences as f64;

    let words = content
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty());
    let (mut long_words, mut technical) = (0usize, 0usize);
    for word in words {
        if word.len() >= 10 {
            long_words += 1;
        }
        if TECHNICAL_TERMS.contains(&word.to_ascii_lowercase().as_str()) {
            technical += 1;
        }
    }

    let complexity =
        avg_sentence_words / 20.0 + long_words as f64 / 100.0 + technical as f64 / 10.0;
    if complexity > 2.0 {
        Difficulty::Advanced
    } else if complexity > 1.0 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, index: u64) -> ScoredChunk {
        ScoredChunk { chunk_index: Some(index), ..ScoredChunk::new(text, 0.5) }
    }

    #[test]
    fn chapters_follow_chunk_index() {
        let hits: Vec<ScoredChunk> = (0..7).rev().map(|i| chunk(&format!("c{i}"), i)).collect();
        let chapters = organize_into_chapters(&hits);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, "c0\n\nc1\n\nc2\n\nc3\n\nc4");
        assert_eq!((chapters[0].start_index, chapters[0].end_index), (Some(0), Some(4)));
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[1].content, "c5\n\nc6");
    }

    #[test]
    fn unindexed_hits_keep_their_order() {
        let hits = vec![ScoredChunk::new("b", 0.9), ScoredChunk::new("a", 0.8), chunk("z", 0)];
        let ordered: Vec<&str> = in_document_order(&hits).iter().map(|h| h.text.as_str()).collect();
        assert_eq!(ordered, ["b", "a", "z"]);
    }

    #[test]
    fn no_hits_no_chapters() {
        assert!(organize_into_chapters(&[]).is_empty());
    }

    #[test]
    fn short_content_is_one_section() {
        assert_eq!(create_sections("one\n\ntwo"), vec!["one\n\ntwo".to_string()]);
    }

    #[test]
    fn long_content_splits_on_paragraphs() {
        let para = "x".repeat(4_000);
        let content = [para.as_str(); 5].join("\n\n");
        let sections = create_sections(&content);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].chars().count(), 8_002);
        assert_eq!(sections[2].chars().count(), 4_000);
        assert!(sections.iter().all(|s| s.chars().count() <= MAX_SECTION_CHARS));
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time_minutes(0), 0);
        assert_eq!(reading_time_minutes(1), 1);
        assert_eq!(reading_time_minutes(200), 1);
        assert_eq!(reading_time_minutes(201), 2);
    }

    #[test]
    fn word_count_splits_on_spaces() {
        assert_eq!(word_count("a b  c"), 4);
        assert_eq!(word_count(""), 1);
    }

    #[test]
    fn difficulty_levels() {
        assert_eq!(assess_difficulty("Cats sit. Dogs run."), Difficulty::Beginner);

        // Twenty-five words in one sentence.
        let long_sentence = vec!["word"; 25].join(" ") + ".";
        assert_eq!(assess_difficulty(&long_sentence), Difficulty::Intermediate);

        // 24 technical terms in short sentences.
        let technical = vec!["Algorithm optimization."; 12].join(" ");
        assert_eq!(assess_difficulty(&technical), Difficulty::Advanced);
    }

    #[test]
    fn technical_terms_match_whole_words_only() {
        // Twelve matches of "algorithm" would make this intermediate.
        let plural = vec!["algorithms."; 12].join(" ");
        assert_eq!(assess_difficulty(&plural), Difficulty::Beginner);
    }
}
