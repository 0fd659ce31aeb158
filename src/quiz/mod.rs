use anyhow::{Context, Result};
use clap::Args;
use sqlx::SqlitePool;

use crate::llm::openai::{ChatCompletionRequest, LlmClient};
use crate::llm::parse;
use crate::store;
use crate::telemetry::ops::quiz::Phase as QuizPhase;
use crate::telemetry::{self};
use crate::vocab;

pub(crate) mod db;
mod types;

#[derive(Args)]
pub struct QuizCmd {
    #[arg(long, default_value = "default")]
    pub session: String,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

pub async fn run(pool: &SqlitePool, llm: &dyn LlmClient, args: QuizCmd) -> Result<()> {
    let log = telemetry::quiz();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("dry_run", args.dry_run.to_string()),
        ])
        .entered();

    let _load = log.span(&QuizPhase::LoadTerms).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let terms = vocab::db::fetch_terms(pool, session_id).await?;
    drop(_load);
    if terms.is_empty() {
        anyhow::bail!(
            "session '{}' has no vocabulary — run `study vocab` first",
            args.session
        );
    }

    if args.dry_run {
        log.info(format!(
            "📝 Quiz plan — session={} terms={} (one MCQ + one fill-blank each)",
            args.session,
            terms.len()
        ));
        log.info("   Dry run — skipping model calls.");
        if telemetry::config::json_mode() {
            let plan = types::QuizPlan { session: &args.session, terms: terms.len() };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let mut questions: Vec<db::QuestionRow> = Vec::new();
    let mut failures = 0usize;

    for row in &terms {
        let _mcq_span =
            log.span_kv(&QuizPhase::Mcq, [("term", row.term.clone())]).entered();
        match generate_mcq(llm, args.model.as_deref(), &row.term, &row.explanation).await {
            Ok(q) => questions.push(db::QuestionRow {
                term: row.term.clone(),
                kind: db::QuestionKind::Mcq,
                question: q.question,
                options: q.options,
                answer: q.answer,
            }),
            Err(err) => {
                failures += 1;
                log.warn(format!("⚠️  MCQ generation failed for '{}': {err}", row.term));
            }
        }
        drop(_mcq_span);

        let _fb_span =
            log.span_kv(&QuizPhase::FillBlank, [("term", row.term.clone())]).entered();
        match generate_fill_blank(llm, args.model.as_deref(), &row.term, &row.explanation).await {
            Ok(q) => questions.push(db::QuestionRow {
                term: row.term.clone(),
                kind: db::QuestionKind::FillBlank,
                question: q.question,
                options: Vec::new(),
                answer: q.answer,
            }),
            Err(err) => {
                failures += 1;
                log.warn(format!(
                    "⚠️  Fill-blank generation failed for '{}': {err}",
                    row.term
                ));
            }
        }
    }

    if questions.is_empty() {
        log.error("❌ Quiz generation failed for every term");
        anyhow::bail!("quiz generation failed for every term ({failures} failures)");
    }

    let _w = log.span(&QuizPhase::WriteQuestions).entered();
    db::replace_questions(pool, session_id, &questions).await?;
    drop(_w);

    let mcq_count = questions.iter().filter(|q| q.kind == db::QuestionKind::Mcq).count();
    log.info(format!(
        "✅ Quiz ready — {} MCQ(s), {} fill-blank(s), {} failure(s)",
        mcq_count,
        questions.len() - mcq_count,
        failures
    ));

    if telemetry::config::json_mode() {
        let result = types::QuizResult {
            session: &args.session,
            mcq: mcq_count,
            fill_blank: questions.len() - mcq_count,
            failures,
        };
        log.result(&result)?;
    }
    Ok(())
}

async fn generate_mcq(
    llm: &dyn LlmClient,
    model: Option<&str>,
    term: &str,
    definition: &str,
) -> Result<parse::McqQuestion> {
    let mut request = ChatCompletionRequest::user(mcq_prompt(term, definition))
        .with_max_tokens(300)
        .with_temperature(0.4);
    request.model = model.map(str::to_string);
    let response = llm.chat_completion(request).await.context("mcq call")?;
    Ok(parse::mcq(&response.content)?)
}

async fn generate_fill_blank(
    llm: &dyn LlmClient,
    model: Option<&str>,
    term: &str,
    definition: &str,
) -> Result<parse::FillBlank> {
    let mut request = ChatCompletionRequest::user(fill_blank_prompt(term, definition))
        .with_max_tokens(200)
        .with_temperature(0.3);
    request.model = model.map(str::to_string);
    let response = llm.chat_completion(request).await.context("fill-blank call")?;
    Ok(parse::fill_blank(&response.content)?)
}

fn mcq_prompt(term: &str, definition: &str) -> String {
    format!(
        "Create a multiple-choice question for the term \"{term}\".\n\
         Use the definition: \"{definition}\"\n\
         Include 4 options and indicate the correct answer.\n\
         Return only a JSON object shaped like:\n\
         {{\"question\": \"...?\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"answer\": \"the correct option\"}}"
    )
}

fn fill_blank_prompt(term: &str, definition: &str) -> String {
    format!(
        "Create a fill-in-the-blank question using the term \"{term}\" and its \
         definition: \"{definition}\".\n\
         Return only a JSON object shaped like:\n\
         {{\"question\": \"____ is used for ...\", \"answer\": \"{term}\"}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::MockClient;

    async fn seeded_pool() -> (SqlitePool, i64) {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        crate::vocab::db::replace_terms(
            &pool,
            session_id,
            &[("osmosis".to_string(), "diffusion of water".to_string())],
        )
        .await
        .unwrap();
        (pool, session_id)
    }

    fn cmd() -> QuizCmd {
        QuizCmd { session: "default".into(), model: None, dry_run: false }
    }

    #[tokio::test]
    async fn generates_both_kinds_per_term() {
        let (pool, session_id) = seeded_pool().await;

        let mock = MockClient::new();
        mock.push_content(
            r#"{"question": "What is osmosis?", "options": ["Water diffusion", "Cell death", "Protein folding", "Ion pump"], "answer": "Water diffusion"}"#,
        );
        mock.push_content(r#"{"question": "____ moves water across membranes.", "answer": "osmosis"}"#);

        run(&pool, &mock, cmd()).await.unwrap();

        let rows = db::fetch_questions(&pool, session_id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, db::QuestionKind::Mcq);
        assert_eq!(rows[0].options.len(), 4);
        assert_eq!(rows[1].kind, db::QuestionKind::FillBlank);
        assert!(rows[1].options.is_empty());
    }

    #[tokio::test]
    async fn malformed_mcq_is_skipped_but_fill_blank_survives() {
        let (pool, session_id) = seeded_pool().await;

        let mock = MockClient::new();
        mock.push_content("not json at all");
        mock.push_content(r#"{"question": "____ is diffusion of water.", "answer": "osmosis"}"#);

        run(&pool, &mock, cmd()).await.unwrap();

        let rows = db::fetch_questions(&pool, session_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, db::QuestionKind::FillBlank);
    }

    #[tokio::test]
    async fn no_vocab_is_an_error() {
        let pool = crate::store::memory_pool().await.unwrap();
        crate::store::ensure_session(&pool, "default").await.unwrap();
        let mock = MockClient::new();
        assert!(run(&pool, &mock, cmd()).await.is_err());
    }
}
