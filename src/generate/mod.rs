//! Study-aid generation from a material's chunks: quizzes, exams,
//! flashcards and summaries.
//!
//! Unlike [`crate::query`], these pipelines work over a whole material (or
//! space) rather than the best few hits, so callers post every chunk they
//! want covered, in any order. `chunkIndex` restores document order.
//!
//! ```text
//! quiz/exam   hits ─▶ chapters ─▶ one call per chapter ─▶ shuffle ─▶ take count
//! flashcards  hits ─▶ joined text ─▶ one call
//! summary     hits ─▶ joined text ─┬─ ≤ 50k chars ─▶ one call
//!                                  └─ > 50k chars ─▶ one call per section ─▶ overall call
//! ```

mod chapters;
mod prompts;

pub use chapters::{
    CHUNKS_PER_CHAPTER, Chapter, MAX_SECTION_CHARS, assess_difficulty, create_sections,
    in_document_order, organize_into_chapters, reading_time_minutes, word_count,
};

use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{ChatRequest, LlmProvider, ProviderError};
use crate::query::ScoredChunk;
use crate::structured::{
    self, Flashcard, ParseError, QuizQuestion, SectionSummary, StudySummary,
};

pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 20;
pub const DEFAULT_QUESTIONS: usize = 5;
pub const FLASHCARD_COUNT: usize = 20;
/// Above this many chars a summary is built section by section.
pub const MAX_SINGLE_SUMMARY_CHARS: usize = 50_000;

const QUIZ_TEMPERATURE: f32 = 0.7;
const FLASHCARD_TEMPERATURE: f32 = 0.7;
const SUMMARY_TEMPERATURE: f32 = 0.3;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("No content found for the specified study material")]
    NoContent,
    #[error("No valid content found in the study material")]
    EmptyContent,
    #[error("Failed to generate any quiz questions from the content")]
    NothingGenerated,
    #[error("generation failed: {0}")]
    Generation(#[from] ProviderError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ── Quiz options ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionType {
    #[default]
    Mcq,
    Text,
    Mixed,
}

impl QuestionType {
    /// `"mcq"`, `"text"` or `"mixed"`. Anything else, or no label, is
    /// multiple choice.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("text") => QuestionType::Text,
            Some("mixed") => QuestionType::Mixed,
            _ => QuestionType::Mcq,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOptions {
    pub count: usize,
    pub question_type: QuestionType,
    /// Target exam duration in minutes, passed to the model as guidance.
    pub exam_length_minutes: Option<f64>,
}

impl QuizOptions {
    pub fn new(count: usize) -> Self {
        Self { count, question_type: QuestionType::Mcq, exam_length_minutes: None }
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.count < MIN_QUESTIONS {
            return Err(GenerateError::Validation(vec![
                "The number of questions must be at least 1".into(),
            ]));
        }
        if self.count > MAX_QUESTIONS {
            return Err(GenerateError::Validation(vec![
                "The number of questions must be between 1 and 20".into(),
            ]));
        }
        Ok(())
    }
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS)
    }
}

fn chat(prompt: String, temperature: f32) -> ChatRequest {
    ChatRequest { temperature: Some(temperature), ..ChatRequest::user(prompt) }
}

// ── Quiz / exam ───────────────────────────────────────────────────────────────

/// Generate `options.count` questions spread over the chapters of `hits`.
///
/// Each chapter is asked for `ceil(count / chapters)` questions. A chapter
/// whose call or output fails is skipped; the quiz only fails when no chapter
/// produced anything. The pooled questions are shuffled and cut to `count`.
pub async fn generate_quiz(
    provider: &LlmProvider,
    hits: &[ScoredChunk],
    options: &QuizOptions,
) -> Result<Vec<QuizQuestion>, GenerateError> {
    options.validate()?;
    if hits.is_empty() {
        return Err(GenerateError::NoContent);
    }

    let chapters = organize_into_chapters(hits);
    let per_chapter = options.count.div_ceil(chapters.len());
    info!(
        chapters = chapters.len(),
        per_chapter,
        count = options.count,
        provider = provider.name(),
        "generating quiz"
    );

    let mut questions = Vec::new();
    for chapter in &chapters {
        let request = chat(prompts::quiz(chapter, per_chapter, options), QUIZ_TEMPERATURE);
        let parsed = match provider.complete(&request).await {
            Ok(response) => structured::parse_quiz(&response.text).map_err(GenerateError::from),
            Err(e) => Err(GenerateError::from(e)),
        };
        match parsed {
            Ok(mut batch) => {
                debug!(chapter = %chapter.title, questions = batch.len(), "chapter done");
                questions.append(&mut batch);
            }
            Err(e) => warn!(chapter = %chapter.title, "skipping chapter: {e}"),
        }
    }

    if questions.is_empty() {
        return Err(GenerateError::NothingGenerated);
    }

    questions.shuffle(&mut rand::rng());
    questions.truncate(options.count);
    Ok(questions)
}

// ── Flashcards ────────────────────────────────────────────────────────────────

/// One call over the whole material asking for [`FLASHCARD_COUNT`] cards.
/// Whatever number of cards the model returns is kept.
pub async fn generate_flashcards(
    provider: &LlmProvider,
    hits: &[ScoredChunk],
) -> Result<Vec<Flashcard>, GenerateError> {
    if hits.is_empty() {
        return Err(GenerateError::NoContent);
    }

    let context = joined_text(hits.iter());
    if context.trim().is_empty() {
        return Err(GenerateError::EmptyContent);
    }

    info!(hits = hits.len(), provider = provider.name(), "generating flashcards");
    let request = chat(prompts::flashcards(FLASHCARD_COUNT, &context), FLASHCARD_TEMPERATURE);
    let response = provider.complete(&request).await?;
    Ok(structured::parse_flashcards(&response.text)?)
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Summarize the material in document order.
///
/// Reading time and difficulty are computed locally and replace whatever the
/// model reported. Long material is summarized per section first; any failing
/// section fails the whole summary.
pub async fn generate_summary(
    provider: &LlmProvider,
    hits: &[ScoredChunk],
) -> Result<StudySummary, GenerateError> {
    if hits.is_empty() {
        return Err(GenerateError::NoContent);
    }

    let ordered = in_document_order(hits);
    let words: u64 = ordered.iter().map(|hit| word_count(&hit.text)).sum();
    let content = joined_text(ordered.into_iter());
    if content.trim().is_empty() {
        return Err(GenerateError::EmptyContent);
    }

    let content_chars = content.chars().count();
    let mut summary = if content_chars > MAX_SINGLE_SUMMARY_CHARS {
        sectioned_summary(provider, &content).await?
    } else {
        info!(content_chars, provider = provider.name(), "generating summary");
        let request = chat(prompts::comprehensive_summary(&content), SUMMARY_TEMPERATURE);
        let response = provider.complete(&request).await?;
        StudySummary { sections: Vec::new(), ..structured::parse_summary(&response.text)? }
    };

    summary.estimated_reading_time = reading_time_minutes(words);
    summary.difficulty = assess_difficulty(&content);
    Ok(summary)
}

async fn sectioned_summary(
    provider: &LlmProvider,
    content: &str,
) -> Result<StudySummary, GenerateError> {
    let sections = create_sections(content);
    info!(sections = sections.len(), provider = provider.name(), "generating sectioned summary");

    let mut summaries: Vec<SectionSummary> = Vec::with_capacity(sections.len());
    for (i, section) in sections.iter().enumerate() {
        let request = chat(prompts::section_summary(i + 1, section), SUMMARY_TEMPERATURE);
        let response = provider.complete(&request).await?;
        summaries.push(structured::parse_section(&response.text)?);
        debug!(section = i + 1, "section summarized");
    }

    let request = chat(prompts::overall_summary(&summaries), SUMMARY_TEMPERATURE);
    let response = provider.complete(&request).await?;
    Ok(StudySummary { sections: summaries, ..structured::parse_summary(&response.text)? })
}

/// Non-empty hit texts joined by blank lines.
fn joined_text<'a>(hits: impl Iterator<Item = &'a ScoredChunk>) -> String {
    hits.map(|hit| hit.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::structured::Difficulty;

    // The dummy provider echoes the prompt behind an "[echo]" prefix. Object
    // outputs parse as the prompt's format example; array outputs never do.
    fn dummy() -> LlmProvider {
        LlmProvider::Dummy(DummyProvider)
    }

    fn hits(texts: &[&str]) -> Vec<ScoredChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ScoredChunk { chunk_index: Some(i as u64), ..ScoredChunk::new(*t, 0.5) })
            .collect()
    }

    #[test]
    fn count_bounds() {
        assert!(QuizOptions::new(1).validate().is_ok());
        assert!(QuizOptions::new(20).validate().is_ok());
        let Err(GenerateError::Validation(low)) = QuizOptions::new(0).validate() else {
            panic!("expected validation error")
        };
        assert_eq!(low, ["The number of questions must be at least 1"]);
        let Err(GenerateError::Validation(high)) = QuizOptions::new(21).validate() else {
            panic!("expected validation error")
        };
        assert_eq!(high, ["The number of questions must be between 1 and 20"]);
    }

    #[test]
    fn question_type_labels() {
        assert_eq!(QuestionType::from_label(None), QuestionType::Mcq);
        assert_eq!(QuestionType::from_label(Some("text")), QuestionType::Text);
        assert_eq!(QuestionType::from_label(Some("mixed")), QuestionType::Mixed);
        assert_eq!(QuestionType::from_label(Some("essay")), QuestionType::Mcq);
    }

    #[tokio::test]
    async fn quiz_without_hits_has_no_content() {
        let err = generate_quiz(&dummy(), &[], &QuizOptions::default()).await.unwrap_err();
        assert!(matches!(err, GenerateError::NoContent));
    }

    #[tokio::test]
    async fn quiz_with_no_parsable_chapter_fails() {
        let material = hits(&["a", "b", "c", "d", "e", "f"]);
        let err = generate_quiz(&dummy(), &material, &QuizOptions::new(3)).await.unwrap_err();
        assert!(matches!(err, GenerateError::NothingGenerated));
        assert_eq!(err.to_string(), "Failed to generate any quiz questions from the content");
    }

    #[tokio::test]
    async fn quiz_invalid_count_checked_before_content() {
        let err = generate_quiz(&dummy(), &[], &QuizOptions::new(21)).await.unwrap_err();
        assert!(matches!(err, GenerateError::Validation(_)));
    }

    #[tokio::test]
    async fn flashcards_blank_material_is_empty_content() {
        let err = generate_flashcards(&dummy(), &hits(&["", "  \n"])).await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyContent));
    }

    #[tokio::test]
    async fn flashcards_bad_output_is_parse_error() {
        let err = generate_flashcards(&dummy(), &hits(&["cells"])).await.unwrap_err();
        assert!(matches!(err, GenerateError::Parse(ParseError::Malformed { .. })));
    }

    #[tokio::test]
    async fn short_summary_overrides_stats() {
        let text = vec!["word"; 250].join(" ");
        let summary = generate_summary(&dummy(), &hits(&[text.as_str(), "Cats sit."])).await.unwrap();
        assert_eq!(summary.title, "Descriptive title");
        assert!(summary.sections.is_empty());
        // 252 words
        assert_eq!(summary.estimated_reading_time, 2);
        assert_eq!(summary.difficulty, Difficulty::Advanced);
    }

    #[tokio::test]
    async fn long_summary_goes_section_by_section() {
        let para = "x".repeat(9_000);
        let material = hits(&[para.as_str(); 6]);
        let summary = generate_summary(&dummy(), &material).await.unwrap();
        assert_eq!(summary.sections.len(), 6);
        assert_eq!(summary.sections[0].title, "Section title");
        assert_eq!(summary.title, "Descriptive title");
        assert_eq!(summary.estimated_reading_time, 1);
    }

    #[tokio::test]
    async fn summary_without_hits_has_no_content() {
        let err = generate_summary(&dummy(), &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "No content found for the specified study material");
    }
}
