use anyhow::{Context, Result};
use clap::Args;
use sqlx::SqlitePool;

use crate::llm::openai::{ChatCompletionRequest, LlmClient};
use crate::llm::parse;
use crate::store;
use crate::telemetry::ops::vocab::Phase as VocabPhase;
use crate::telemetry::{self};

pub(crate) mod db;
mod types;

const GENERIC_WORDS: [&str; 3] = ["lot", "thing", "goal"];

#[derive(Args)]
pub struct VocabCmd {
    #[arg(long, default_value = "default")]
    pub session: String,
    /// How many key terms to extract
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

pub async fn run(pool: &SqlitePool, llm: &dyn LlmClient, args: VocabCmd) -> Result<()> {
    let log = telemetry::vocab();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("top_k", args.top_k.to_string()),
            ("dry_run", args.dry_run.to_string()),
        ])
        .entered();

    // Terms come from the concise summary, not the raw document; the summary
    // already concentrates the terminology worth studying.
    let _load = log.span(&VocabPhase::LoadSummary).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let summary = store::fetch_summary(pool, session_id).await?.with_context(|| {
        format!("session '{}' has no summary — run `study summarize` first", args.session)
    })?;
    drop(_load);

    if args.dry_run {
        log.info(format!(
            "📝 Vocab plan — session={} top_k={} summary_chars={}",
            args.session,
            args.top_k,
            summary.chars().count()
        ));
        log.info("   Dry run — skipping model calls.");
        if telemetry::config::json_mode() {
            let plan = types::VocabPlan {
                session: &args.session,
                top_k: args.top_k,
                summary_chars: summary.chars().count(),
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let _extract = log.span(&VocabPhase::ExtractTerms).entered();
    let mut request = ChatCompletionRequest::user(extract_prompt(&summary, args.top_k))
        .with_max_tokens(250)
        .with_temperature(0.2);
    request.model = args.model.clone();
    let response = llm.chat_completion(request).await.context("extract key terms")?;
    let terms = parse::term_list(&response.content, args.top_k).context("parse term list")?;
    drop(_extract);
    log.info(format!("📚 Extracted {} term(s)", terms.len()));

    // One explanation call per term; a failure becomes a diagnostic
    // explanation and the rest still get theirs.
    let mut explained: Vec<(String, String)> = Vec::new();
    for term in &terms {
        let _s = log.span_kv(&VocabPhase::Explain, [("term", term.clone())]).entered();
        let mut request = ChatCompletionRequest::user(explain_prompt(term)).with_max_tokens(80);
        request.model = args.model.clone();
        match llm.chat_completion(request).await {
            Ok(resp) => {
                log.debug(format!("explained '{term}'"));
                explained.push((term.clone(), resp.content.trim().to_string()));
            }
            Err(err) => {
                log.warn(format!("⚠️  Explanation failed for '{term}': {err}"));
                explained.push((term.clone(), format!("[explanation failed: {err}]")));
            }
        }
    }

    let generic: Vec<String> =
        explained.iter().map(|(t, _)| t.clone()).filter(|t| is_generic(t)).collect();
    if !generic.is_empty() {
        log.warn(format!(
            "⚠️  Some extracted terms may be too generic: {}",
            generic.join(", ")
        ));
    }

    let _w = log.span(&VocabPhase::WriteTerms).entered();
    db::replace_terms(pool, session_id, &explained).await?;
    drop(_w);

    for (term, explanation) in &explained {
        log.info(format!("  {term} — {explanation}"));
    }

    if telemetry::config::json_mode() {
        let result = types::VocabResult {
            session: &args.session,
            terms: explained
                .iter()
                .map(|(term, explanation)| types::TermDto {
                    term: term.clone(),
                    explanation: explanation.clone(),
                })
                .collect(),
            generic_terms: generic,
        };
        log.result(&result)?;
    }
    Ok(())
}

fn extract_prompt(text: &str, top_k: usize) -> String {
    format!(
        "From the following text, extract the {top_k} most relevant technical terms \
         or domain-specific keywords. Ignore vague English words, slang, or general terms.\n\
         Return only a JSON array of strings. No explanations.\n\nText:\n\"\"\"{text}\"\"\""
    )
}

fn explain_prompt(term: &str) -> String {
    format!("Explain the term '{term}' in simple words suitable for a student.")
}

fn is_generic(term: &str) -> bool {
    term.chars().count() <= 4 || GENERIC_WORDS.contains(&term.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::{MockClient, ModelError};

    async fn seeded_pool() -> (SqlitePool, i64) {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        crate::ingest::db::replace_document(&pool, session_id, "text", None, "doc body")
            .await
            .unwrap();
        crate::summarize::db::upsert_summary(&pool, session_id, "summary text", 1, 0, None)
            .await
            .unwrap();
        (pool, session_id)
    }

    fn cmd() -> VocabCmd {
        VocabCmd { session: "default".into(), top_k: 10, model: None, dry_run: false }
    }

    #[tokio::test]
    async fn stores_terms_with_explanations() {
        let (pool, session_id) = seeded_pool().await;

        let mock = MockClient::new();
        mock.push_content(r#"["gradient descent", "entropy"]"#);
        mock.push_content("How models walk downhill.");
        mock.push_content("A measure of disorder.");

        run(&pool, &mock, cmd()).await.unwrap();

        let terms = db::fetch_terms(&pool, session_id).await.unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].term, "gradient descent");
        assert_eq!(terms[0].explanation, "How models walk downhill.");
        assert_eq!(terms[1].term, "entropy");
    }

    #[tokio::test]
    async fn failed_explanation_degrades_without_aborting() {
        let (pool, session_id) = seeded_pool().await;

        let mock = MockClient::new();
        mock.push_content(r#"["alpha", "beta"]"#);
        mock.push_response(Err(ModelError::Timeout));
        mock.push_content("Second explanation.");

        run(&pool, &mock, cmd()).await.unwrap();

        let terms = db::fetch_terms(&pool, session_id).await.unwrap();
        assert_eq!(terms.len(), 2);
        assert!(terms[0].explanation.starts_with("[explanation failed:"));
        assert_eq!(terms[1].explanation, "Second explanation.");
    }

    #[tokio::test]
    async fn unparseable_term_list_is_an_error() {
        let (pool, _) = seeded_pool().await;

        let mock = MockClient::new();
        mock.push_content("I cannot list terms, sorry.");

        assert!(run(&pool, &mock, cmd()).await.is_err());
    }

    #[test]
    fn generic_term_detection() {
        assert!(is_generic("lot"));
        assert!(is_generic("Goal"));
        assert!(is_generic("spin"));
        assert!(!is_generic("entropy"));
    }
}
