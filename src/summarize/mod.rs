use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use sqlx::SqlitePool;

use crate::chunker::{self, ChunkLimit, ChunkTransform, MIN_INPUT_CHARS};
use crate::llm::openai::{ChatCompletionRequest, LlmClient};
use crate::store;
use crate::telemetry::ops::summarize::Phase as SummarizePhase;
use crate::telemetry::{self};

pub(crate) mod db;
mod types;

#[derive(Args)]
pub struct SummarizeCmd {
    #[arg(long, default_value = "default")]
    pub session: String,
    /// Greedy packing bound, in words per chunk
    #[arg(long, default_value_t = 450)]
    pub max_chunk_words: usize,
    /// Bound chunks by characters instead of words (for char-limited models)
    #[arg(long, conflicts_with = "max_chunk_words")]
    pub max_chunk_chars: Option<usize>,
    /// Chunks under this many words carry too little to summarize
    #[arg(long, default_value_t = 40)]
    pub min_admit_words: usize,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Per-chunk summarization call behind the aggregator's transform seam.
struct SummarizeTransform<'a> {
    llm: &'a dyn LlmClient,
    model: Option<String>,
}

#[async_trait]
impl ChunkTransform for SummarizeTransform<'_> {
    async fn apply(&self, chunk: &str) -> anyhow::Result<String> {
        let mut request = ChatCompletionRequest::user(summarize_prompt(chunk))
            .with_max_tokens(130)
            .with_temperature(0.3);
        request.model = self.model.clone();
        let response = self.llm.chat_completion(request).await?;
        Ok(response.content)
    }
}

fn summarize_prompt(chunk: &str) -> String {
    format!(
        "Summarize the following passage in a few concise sentences. \
         Keep the key facts and terminology; drop filler.\n\n{chunk}"
    )
}

pub async fn run(pool: &SqlitePool, llm: &dyn LlmClient, args: SummarizeCmd) -> Result<()> {
    let log = telemetry::summarize();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("max_chunk_words", args.max_chunk_words.to_string()),
            ("min_admit_words", args.min_admit_words.to_string()),
            ("dry_run", args.dry_run.to_string()),
        ])
        .entered();

    let _load = log.span(&SummarizePhase::LoadDoc).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let doc = store::require_document(pool, session_id, &args.session).await?;
    drop(_load);
    log.info(format!(
        "📄 Document: {} chars / {} words",
        doc.char_count, doc.word_count
    ));

    let limit = match args.max_chunk_chars {
        Some(chars) => ChunkLimit::MaxChars(chars),
        None => ChunkLimit::MaxWords(args.max_chunk_words),
    };
    let short_input = doc.text_clean.trim().chars().count() < MIN_INPUT_CHARS;

    let _chunk_span = log.span(&SummarizePhase::Chunk).entered();
    let chunks = chunker::chunk(&doc.text_clean, limit)?;
    let admitted: Vec<usize> = chunks
        .iter()
        .map(|c| c.split_whitespace().count())
        .filter(|&w| w >= args.min_admit_words)
        .collect();
    let filtered = chunks.len() - admitted.len();
    drop(_chunk_span);

    if args.dry_run {
        let _s = log.span(&SummarizePhase::Plan).entered();
        log.info(format!(
            "📝 Summarize plan — session={} chunks={} admitted={} filtered={} short_input={}",
            args.session,
            chunks.len(),
            admitted.len(),
            filtered,
            short_input
        ));
        log.info("   Dry run — skipping model calls.");
        if telemetry::config::json_mode() {
            let plan = types::SummarizePlan {
                session: &args.session,
                chunks: chunks.len(),
                admitted: admitted.len(),
                filtered,
                max_chunk_words: args.max_chunk_words,
                min_admit_words: args.min_admit_words,
                short_input,
                admitted_chunk_words: admitted,
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let transform = SummarizeTransform { llm, model: args.model.clone() };
    let _call = log.span(&SummarizePhase::CallModel).entered();
    log.info(format!("🧠 Summarizing {} chunk(s)", admitted.len()));
    let content = chunker::aggregate(&doc.text_clean, limit, args.min_admit_words, &transform)
        .await?;
    drop(_call);

    let stored = !chunker::is_guard(&content);
    if stored {
        let _w = log.span(&SummarizePhase::WriteSummary).entered();
        db::upsert_summary(
            pool,
            session_id,
            &content,
            chunks.len(),
            filtered,
            args.model.as_deref(),
        )
        .await?;
        drop(_w);
        log.info(format!("💡 Summary:\n{content}"));
    } else {
        log.warn(format!("⚠️  No summary stored — {content}"));
    }

    if telemetry::config::json_mode() {
        let result = types::SummarizeResult {
            session: &args.session,
            summary: &content,
            chunks: chunks.len(),
            filtered,
            stored,
        };
        log.result(&result)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openai::MockClient;

    #[tokio::test]
    async fn transform_forwards_chunk_and_returns_content() {
        let mock = MockClient::new();
        mock.push_content("a tidy summary");

        let transform = SummarizeTransform { llm: &mock, model: None };
        let out = transform.apply("some chunk text").await.unwrap();

        assert_eq!(out, "a tidy summary");
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].messages[0].content.contains("some chunk text"));
        assert_eq!(calls[0].max_tokens, Some(130));
    }

    #[tokio::test]
    async fn transform_surfaces_model_failures() {
        let mock = MockClient::new();
        // queue empty -> MockQueueEmpty error
        let transform = SummarizeTransform { llm: &mock, model: None };
        assert!(transform.apply("chunk").await.is_err());
    }

    #[test]
    fn prompt_embeds_the_chunk() {
        let p = summarize_prompt("CHUNK BODY");
        assert!(p.contains("CHUNK BODY"));
        assert!(p.starts_with("Summarize"));
    }

    fn cmd() -> SummarizeCmd {
        SummarizeCmd {
            session: "default".into(),
            max_chunk_words: 60,
            max_chunk_chars: None,
            min_admit_words: 40,
            model: None,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn run_stores_the_aggregate_summary() {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        let body: String =
            (0..120).map(|i| format!("token{i:03}")).collect::<Vec<_>>().join(" ");
        crate::ingest::db::replace_document(&pool, session_id, "text", None, &body)
            .await
            .unwrap();

        let mock = MockClient::new();
        mock.push_content("part one.");
        mock.push_content("part two.");

        run(&pool, &mock, cmd()).await.unwrap();

        let summary = crate::store::fetch_summary(&pool, session_id).await.unwrap().unwrap();
        assert_eq!(summary, "part one. part two.");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn short_document_stores_nothing() {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "default").await.unwrap();
        crate::ingest::db::replace_document(&pool, session_id, "text", None, "tiny doc text")
            .await
            .unwrap();

        let mock = MockClient::new();
        run(&pool, &mock, cmd()).await.unwrap();

        assert!(crate::store::fetch_summary(&pool, session_id).await.unwrap().is_none());
        assert!(mock.calls().is_empty());
    }
}
