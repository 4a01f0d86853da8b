//! Prompt text for the study-aid generators.
//!
//! Each prompt ends with an explicit JSON shape that [`crate::structured`]
//! parses back.

use super::chapters::Chapter;
use super::{QuestionType, QuizOptions};
use crate::structured::SectionSummary;

const QUIZ_FORMAT: &str = r#"Respond with ONLY valid JSON (no markdown, no explanations) in this exact format:
[
  { "type": "quiz" },
  {
    "question": "Question text here?",
    "options": ["A) option1", "B) option2", "C) option3", "D) option4"],
    "answer": "A) option1",
    "hint": "Brief hint",
    "explanation": "Why this is correct"
  }
]"#;

const SHORT_ANSWER_NOTE: &str =
    r#"For short answer questions use an empty "options" array and put the expected answer in "answer"."#;

const FLASHCARD_FORMAT: &str = r#"Respond with ONLY valid JSON (no markdown, no explanations) in this exact format:
[
  { "type": "flashcards" },
  {
    "question": "Front of card",
    "answer": "Back of card",
    "hint": "Memory aid"
  }
]"#;

const SUMMARY_FORMAT: &str = r#"Respond with ONLY valid JSON (no markdown, no explanations) in this exact format:
{
  "title": "Descriptive title",
  "mainSummary": "Main summary text",
  "keyPoints": ["Key point 1", "Key point 2"],
  "importantConcepts": ["Concept 1", "Concept 2"],
  "difficulty": "intermediate",
  "estimatedReadingTime": 10,
  "sections": []
}"#;

const SECTION_FORMAT: &str = r#"Respond with ONLY valid JSON (no markdown, no explanations) in this exact format:
{
  "title": "Section title",
  "summary": "Section summary",
  "keyPoints": ["Key point 1", "Key point 2"]
}"#;

pub(super) fn quiz(chapter: &Chapter, per_chapter: usize, options: &QuizOptions) -> String {
    let kind = match options.question_type {
        QuestionType::Mcq => "multiple-choice quiz questions",
        QuestionType::Text => "short answer (text) quiz questions (no options, just a short answer)",
        QuestionType::Mixed => "a mix of multiple-choice and short answer quiz questions",
    };
    let answer_line = match options.question_type {
        QuestionType::Text => "- A short answer (no options)",
        QuestionType::Mcq | QuestionType::Mixed => "- Four options (A, B, C, D) with one correct answer",
    };
    let exam_length = options
        .exam_length_minutes
        .filter(|minutes| *minutes > 0.0)
        .map(|minutes| format!("\nThe exam should be designed to take about {minutes} minutes."))
        .unwrap_or_default();
    let format_note = match options.question_type {
        QuestionType::Mcq => String::new(),
        QuestionType::Text | QuestionType::Mixed => format!("\n{SHORT_ANSWER_NOTE}"),
    };

    format!(
        "Based on the following chapter content, generate exactly {per_chapter} {kind} that cover the most important concepts.{exam_length}

Each question should have:
- A clear, concise question that tests understanding
{answer_line}
- An explanation of why the correct answer is right

Chapter: {title}

Content:
{content}

Please generate {per_chapter} quiz questions that test comprehension of the key concepts from this chapter.

{QUIZ_FORMAT}{format_note}",
        title = chapter.title,
        content = chapter.content,
    )
}

pub(super) fn flashcards(count: usize, context: &str) -> String {
    format!(
        "Based on the following study material, generate exactly {count} flashcards. Each flashcard should have:
- A clear, concise question that tests understanding of the material
- A detailed answer or explanation
- A helpful hint that guides without giving away the answer

Focus on the most important concepts, key terms, processes, and relationships described in the material. Make sure the flashcards cover different aspects and difficulty levels.

Study Material:
{context}

Please generate the flashcards covering the most important concepts from this material.

{FLASHCARD_FORMAT}"
    )
}

pub(super) fn comprehensive_summary(content: &str) -> String {
    format!(
        "Create a comprehensive summary of the following study material. Provide:

1. A descriptive title for the material
2. A main summary that captures the essential content and key themes
3. A list of key points (5-8 bullet points) highlighting the most important information
4. A list of important concepts or terms that students should understand
5. Assess the difficulty level (beginner, intermediate or advanced) based on complexity and technical depth
6. Estimate reading time based on content length

NOTE: Since this is a comprehensive summary (not sectioned), provide an empty array for sections.

Study Material Content:
{content}

Please create a well-structured summary that would help a student understand the main concepts and prepare for studying this material.

{SUMMARY_FORMAT}"
    )
}

/// `number` is 1-based.
pub(super) fn section_summary(number: usize, section: &str) -> String {
    format!(
        "Summarize this section of the study material:

Section {number} Content:
{section}

Provide:
- A descriptive title for this section
- A concise summary of the section's content
- Key points from this section (3-5 points)

{SECTION_FORMAT}"
    )
}

pub(super) fn overall_summary(sections: &[SectionSummary]) -> String {
    let digest = sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "Section {}: {}\n{}\nKey Points: {}",
                i + 1,
                s.title,
                s.summary,
                s.key_points.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based on the following section summaries, create an overall summary of the study material:

{digest}

Provide:
1. An overall title for the entire material
2. A comprehensive main summary that ties together all sections
3. Overall key points (6-10 points) from across all sections
4. Important concepts that span the entire material
5. Assess overall difficulty level (beginner, intermediate or advanced)

NOTE: The sections array will be populated separately with the detailed section summaries.

{SUMMARY_FORMAT}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter() -> Chapter {
        Chapter {
            title: "Chapter 2".into(),
            content: "Mitochondria make ATP.".into(),
            start_index: Some(5),
            end_index: Some(9),
        }
    }

    #[test]
    fn quiz_prompt_asks_for_per_chapter_count() {
        let p = quiz(&chapter(), 3, &QuizOptions::new(5));
        assert!(p.starts_with(
            "Based on the following chapter content, generate exactly 3 multiple-choice quiz questions"
        ));
        assert!(p.contains("Chapter: Chapter 2\n\nContent:\nMitochondria make ATP."));
        assert!(p.contains("- Four options (A, B, C, D) with one correct answer"));
        assert!(p.contains(r#"{ "type": "quiz" }"#));
        assert!(!p.contains("exam should be designed"));
        assert!(!p.contains("empty \"options\" array"));
    }

    #[test]
    fn exam_prompt_carries_type_and_length() {
        let options = QuizOptions {
            question_type: QuestionType::Text,
            exam_length_minutes: Some(45.0),
            ..QuizOptions::new(10)
        };
        let p = quiz(&chapter(), 4, &options);
        assert!(p.contains("generate exactly 4 short answer (text) quiz questions"));
        assert!(p.contains("important concepts.\nThe exam should be designed to take about 45 minutes."));
        assert!(p.contains("- A short answer (no options)"));
        assert!(p.ends_with(SHORT_ANSWER_NOTE));
    }

    #[test]
    fn overall_prompt_lists_sections() {
        let sections = vec![
            SectionSummary { title: "Cells".into(), summary: "About cells.".into(), key_points: vec!["a".into(), "b".into()] },
            SectionSummary { title: "Energy".into(), summary: "About ATP.".into(), key_points: vec![] },
        ];
        let p = overall_summary(&sections);
        assert!(p.contains("Section 1: Cells\nAbout cells.\nKey Points: a, b\n\nSection 2: Energy\nAbout ATP.\nKey Points: "));
        assert!(p.contains(r#""mainSummary""#));
    }

    #[test]
    fn flashcard_prompt_embeds_material() {
        let p = flashcards(20, "ctx");
        assert!(p.starts_with("Based on the following study material, generate exactly 20 flashcards."));
        assert!(p.contains("Study Material:\nctx\n\n"));
    }
}
