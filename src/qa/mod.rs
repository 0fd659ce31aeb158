use anyhow::{Context, Result};
use clap::Args;
use sqlx::SqlitePool;

use crate::llm::openai::{ChatCompletionRequest, LlmClient};
use crate::store;
use crate::telemetry::ops::ask::Phase as AskPhase;
use crate::telemetry::{self};

pub(crate) mod db;
mod types;

// Whole-document prompting; anything past this budget is elided, not chunked,
// because answers want the opening context most.
const CONTEXT_CHAR_BUDGET: usize = 24_000;
const ELISION_MARKER: &str = "[... content truncated ...]";

#[derive(Args)]
pub struct AskCmd {
    /// Question to answer against the session's content
    pub question: String,
    #[arg(long, default_value = "default")]
    pub session: String,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

pub async fn run(pool: &SqlitePool, llm: &dyn LlmClient, args: AskCmd) -> Result<()> {
    let log = telemetry::ask();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("dry_run", args.dry_run.to_string()),
        ])
        .entered();

    let question = args.question.trim();
    if question.is_empty() {
        anyhow::bail!("question is empty");
    }

    let _load = log.span(&AskPhase::LoadDoc).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let doc = store::require_document(pool, session_id, &args.session).await?;
    drop(_load);

    let _p = log.span(&AskPhase::Prompt).entered();
    let (prompt, truncated) = build_prompt(&doc.text_clean, question);
    drop(_p);
    if truncated {
        log.warn(format!(
            "⚠️  Content exceeds the {CONTEXT_CHAR_BUDGET}-char context budget — tail elided"
        ));
    }

    if args.dry_run {
        log.info("📝 Dry run — skipping model call");
        if telemetry::config::json_mode() {
            let plan = types::AskPlan {
                session: &args.session,
                question,
                prompt_chars: prompt.chars().count(),
                truncated,
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let mut request = ChatCompletionRequest::user(prompt)
        .with_max_tokens(350)
        .with_temperature(0.3);
    request.model = args.model.clone();

    let _call = log.span(&AskPhase::CallModel).entered();
    let response = llm
        .chat_completion(request)
        .await
        .context("answer question")?;
    drop(_call);

    let answer = response.content.trim().to_string();
    log.info(format!("💡 Answer:\n{answer}"));

    let _w = log.span(&AskPhase::WriteAnswer).entered();
    db::insert_qa(pool, session_id, question, &answer).await?;
    drop(_w);

    if telemetry::config::json_mode() {
        let usage = response.usage.map(|u| types::UsageDto {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let result = types::AskResult {
            session: &args.session,
            question,
            answer: &answer,
            truncated,
            usage,
        };
        log.result(&result)?;
    }
    Ok(())
}

fn build_prompt(content: &str, question: &str) -> (String, bool) {
    let total = content.chars().count();
    let truncated = total > CONTEXT_CHAR_BUDGET;
    let body: String = if truncated {
        let mut cut: String = content.chars().take(CONTEXT_CHAR_BUDGET).collect();
        cut.push('\n');
        cut.push_str(ELISION_MARKER);
        cut
    } else {
        content.to_string()
    };

    let prompt = format!(
        "Given the following content, answer the user's question clearly and concisely.\n\n\
         Content:\n{body}\n\nQuestion: {question}"
    );
    (prompt, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::MockClient;

    #[test]
    fn prompt_contains_content_and_question() {
        let (prompt, truncated) = build_prompt("short doc", "what is it?");
        assert!(prompt.contains("short doc"));
        assert!(prompt.contains("Question: what is it?"));
        assert!(!truncated);
    }

    #[test]
    fn oversized_content_is_elided() {
        let content = "x".repeat(CONTEXT_CHAR_BUDGET + 100);
        let (prompt, truncated) = build_prompt(&content, "q?");
        assert!(truncated);
        assert!(prompt.contains(ELISION_MARKER));
        assert!(prompt.chars().count() < content.chars().count() + 200);
    }

    #[tokio::test]
    async fn ask_stores_the_pair() {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        crate::ingest::db::replace_document(&pool, session_id, "text", None, "The sky is blue.")
            .await
            .unwrap();

        let mock = MockClient::new();
        mock.push_content("Because of Rayleigh scattering.");

        let args = AskCmd {
            question: "Why is the sky blue?".into(),
            session: "default".into(),
            model: None,
            dry_run: false,
        };
        run(&pool, &mock, args).await.unwrap();

        let rows = db::fetch_qa_pairs(&pool, session_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "Why is the sky blue?");
        assert_eq!(rows[0].answer, "Because of Rayleigh scattering.");
    }
}
