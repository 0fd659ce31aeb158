use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::SqlitePool;

use crate::qa;
use crate::quiz;
use crate::resources::{self, Resource};
use crate::store;
use crate::study_plan;
use crate::telemetry::ops::report::Phase as ReportPhase;
use crate::telemetry::{self};
use crate::util::text;
use crate::vocab;

mod types;
mod writer;

pub use writer::Section;

const PREVIEW_CHARS: usize = 1000;

#[derive(Args)]
pub struct ReportCmd {
    #[arg(long, default_value = "default")]
    pub session: String,
    /// Output path for the markdown report
    #[arg(long, default_value = "study_report.md")]
    pub out: PathBuf,
}

pub async fn run(pool: &SqlitePool, args: ReportCmd) -> Result<()> {
    let log = telemetry::report();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("out", args.out.display().to_string()),
        ])
        .entered();

    let _collect = log.span(&ReportPhase::Collect).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let doc = store::require_document(pool, session_id, &args.session).await?;
    let summary = store::fetch_summary(pool, session_id).await?;
    let qa_pairs = qa::db::fetch_qa_pairs(pool, session_id).await?;
    let terms = vocab::db::fetch_terms(pool, session_id).await?;
    let questions = quiz::db::fetch_questions(pool, session_id).await?;
    let plan = study_plan::db::fetch_plan(pool, session_id).await?;
    let found = resources::db::fetch_resources(pool, session_id).await?;
    drop(_collect);

    let _assemble = log.span(&ReportPhase::Assemble).entered();
    let sections = assemble(
        &doc,
        summary.as_deref(),
        &qa_pairs,
        &terms,
        &questions,
        plan.as_ref(),
        &found,
    );
    drop(_assemble);

    let _w = log.span(&ReportPhase::WriteFile).entered();
    writer::write_markdown(&args.out, "Study Report", &sections)
        .with_context(|| format!("write report to {}", args.out.display()))?;
    drop(_w);

    log.info(format!(
        "✅ Report with {} section(s) written to {}",
        sections.len(),
        args.out.display()
    ));

    if telemetry::config::json_mode() {
        let result = types::ReportResult {
            session: &args.session,
            path: args.out.display().to_string(),
            sections: sections.iter().map(|s| s.title.clone()).collect(),
        };
        log.result(&result)?;
    }
    Ok(())
}

// Section order mirrors the study workflow; missing artifacts render an
// explicit placeholder line so the report never fails on absence.
fn assemble(
    doc: &store::DocumentRow,
    summary: Option<&str>,
    qa_pairs: &[qa::db::QaRow],
    terms: &[vocab::db::TermRow],
    questions: &[quiz::db::QuestionRow],
    plan: Option<&study_plan::db::PlanRow>,
    found: &[Resource],
) -> Vec<Section> {
    let mut sections = Vec::new();

    let mut preview = match &doc.source_ref {
        Some(source) => format!("Source: {} ({})\n\n", source, doc.source_kind),
        None => String::new(),
    };
    preview.push_str(&text::preview(&doc.text_clean, PREVIEW_CHARS));
    sections.push(Section { title: "Input Content Preview".to_string(), content: preview });

    sections.push(Section {
        title: "Concise Summary".to_string(),
        content: summary
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "No summary generated.".to_string()),
    });

    let qa_content = if qa_pairs.is_empty() {
        "No questions asked.".to_string()
    } else {
        qa_pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| format!("Q{n}: {}\nA{n}: {}", pair.question, pair.answer, n = i + 1))
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    sections.push(Section { title: "Q&A".to_string(), content: qa_content });

    let vocab_content = if terms.is_empty() {
        "No terms extracted.".to_string()
    } else {
        terms
            .iter()
            .map(|t| format!("{}: {}", t.term, t.explanation))
            .collect::<Vec<_>>()
            .join("\n")
    };
    sections.push(Section { title: "Vocabulary".to_string(), content: vocab_content });

    let quiz_content = if questions.is_empty() {
        "No quiz generated.".to_string()
    } else {
        let mut blocks = Vec::new();
        for (i, q) in questions.iter().enumerate() {
            let mut block = format!("Q{}: {}", i + 1, q.question);
            for opt in &q.options {
                block.push_str(&format!("\n  - {opt}"));
            }
            block.push_str(&format!("\nAnswer: {}", q.answer));
            blocks.push(block);
        }
        blocks.join("\n\n")
    };
    sections.push(Section { title: "Quiz".to_string(), content: quiz_content });

    sections.push(Section {
        title: "Personalized Study Plan".to_string(),
        content: plan
            .map(|p| {
                format!(
                    "Topic: {} — {} h/day, goal: {}\n\n{}",
                    p.topic,
                    p.hours_per_day,
                    p.goal,
                    p.content.trim()
                )
            })
            .unwrap_or_else(|| "No study plan generated.".to_string()),
    });

    let resource_content = if found.is_empty() {
        "No resources found.".to_string()
    } else {
        found
            .iter()
            .map(|r| format!("{} ({})\n{}\nLink: {}", r.title, r.source, r.summary, r.link))
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    sections.push(Section { title: "Related Resources".to_string(), content: resource_content });

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> store::DocumentRow {
        store::DocumentRow {
            source_kind: "text".into(),
            source_ref: None,
            text_clean: text.to_string(),
            char_count: text.chars().count() as i64,
            word_count: text.split_whitespace().count() as i64,
        }
    }

    #[test]
    fn empty_session_gets_placeholder_sections() {
        let sections = assemble(&doc("doc body"), None, &[], &[], &[], None, &[]);
        assert_eq!(sections.len(), 7);
        assert_eq!(sections[1].content, "No summary generated.");
        assert_eq!(sections[2].content, "No questions asked.");
        assert_eq!(sections[3].content, "No terms extracted.");
        assert_eq!(sections[4].content, "No quiz generated.");
        assert_eq!(sections[5].content, "No study plan generated.");
        assert_eq!(sections[6].content, "No resources found.");
    }

    #[test]
    fn long_content_previews_at_budget() {
        let content = "word ".repeat(500);
        let sections = assemble(&doc(&content), None, &[], &[], &[], None, &[]);
        assert!(sections[0].content.chars().count() <= PREVIEW_CHARS + 5);
        assert!(sections[0].content.ends_with("..."));
    }

    #[test]
    fn file_sources_are_credited_in_the_preview() {
        let mut d = doc("doc body");
        d.source_kind = "file".into();
        d.source_ref = Some("notes.pdf".into());
        let sections = assemble(&d, None, &[], &[], &[], None, &[]);
        assert!(sections[0].content.starts_with("Source: notes.pdf (file)"));
    }

    #[test]
    fn qa_pairs_are_numbered() {
        let pairs = vec![
            qa::db::QaRow { question: "Why?".into(), answer: "Because.".into() },
            qa::db::QaRow { question: "How?".into(), answer: "Carefully.".into() },
        ];
        let sections = assemble(&doc("doc"), None, &pairs, &[], &[], None, &[]);
        assert!(sections[2].content.contains("Q1: Why?"));
        assert!(sections[2].content.contains("A2: Carefully."));
    }

    #[test]
    fn quiz_block_lists_options_and_answer() {
        let questions = vec![quiz::db::QuestionRow {
            term: "ion".into(),
            kind: quiz::db::QuestionKind::Mcq,
            question: "What is an ion?".into(),
            options: vec!["A charged atom".into(), "A molecule".into()],
            answer: "A charged atom".into(),
        }];
        let sections = assemble(&doc("doc"), None, &[], &[], &questions, None, &[]);
        assert!(sections[4].content.contains("  - A charged atom"));
        assert!(sections[4].content.contains("Answer: A charged atom"));
    }

    #[test]
    fn plan_section_leads_with_topic_and_budget() {
        let plan = study_plan::db::PlanRow {
            topic: "entropy".into(),
            hours_per_day: 3,
            goal: "exam".into(),
            content: "Day 1: definitions.".into(),
        };
        let sections = assemble(&doc("doc"), None, &[], &[], &[], Some(&plan), &[]);
        assert!(sections[5].content.starts_with("Topic: entropy — 3 h/day, goal: exam"));
        assert!(sections[5].content.contains("Day 1: definitions."));
    }
}
