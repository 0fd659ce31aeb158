use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::telemetry::ops::status::Phase as StatusPhase;
use crate::telemetry::{self};

#[derive(Args)]
pub struct StatusCmd {
    /// Limit to one session; omit to list all
    #[arg(long)]
    pub session: Option<String>,
}

#[derive(Serialize)]
pub struct SessionSnapshot {
    pub session: String,
    pub ingested: bool,
    pub chars: Option<i64>,
    pub words: Option<i64>,
    pub has_summary: bool,
    pub qa_pairs: i64,
    pub vocab_terms: i64,
    pub quiz_questions: i64,
    pub has_plan: bool,
    pub resources: i64,
}

#[derive(Serialize)]
struct StatusResult {
    sessions: Vec<SessionSnapshot>,
}

pub async fn run(pool: &SqlitePool, args: StatusCmd) -> Result<()> {
    let log = telemetry::status();
    let _g = log.root_span_kv([("session", format!("{:?}", args.session))]).entered();

    let _s = log.span(&StatusPhase::Snapshot).entered();
    let snapshots = snapshot(pool, args.session.as_deref()).await?;
    drop(_s);

    if snapshots.is_empty() {
        match &args.session {
            Some(name) => log.info(format!("ℹ️  No session named '{name}'.")),
            None => log.info("ℹ️  No sessions yet — run `study ingest` first."),
        }
    } else {
        for s in &snapshots {
            let doc = match (s.chars, s.words) {
                (Some(chars), Some(words)) => format!("{chars} chars / {words} words"),
                _ => "nothing ingested".to_string(),
            };
            log.info(format!(
                "📊 '{}' — {} | summary {} | qa={} vocab={} quiz={} plan {} resources={}",
                s.session,
                doc,
                check(s.has_summary),
                s.qa_pairs,
                s.vocab_terms,
                s.quiz_questions,
                check(s.has_plan),
                s.resources,
            ));
        }
    }

    if telemetry::config::json_mode() {
        log.result(&StatusResult { sessions: snapshots })?;
    }
    Ok(())
}

fn check(flag: bool) -> &'static str {
    if flag { "✓" } else { "—" }
}

async fn snapshot(pool: &SqlitePool, session: Option<&str>) -> Result<Vec<SessionSnapshot>> {
    let rows = sqlx::query(
        r#"
        SELECT s.name,
               d.char_count,
               d.word_count,
               EXISTS(SELECT 1 FROM summary m WHERE m.session_id = s.session_id) AS has_summary,
               (SELECT COUNT(*) FROM qa_pair q WHERE q.session_id = s.session_id) AS qa_pairs,
               (SELECT COUNT(*) FROM vocab_term v WHERE v.session_id = s.session_id) AS vocab_terms,
               (SELECT COUNT(*) FROM quiz_question z WHERE z.session_id = s.session_id) AS quiz_questions,
               EXISTS(SELECT 1 FROM study_plan p WHERE p.session_id = s.session_id) AS has_plan,
               (SELECT COUNT(*) FROM resource r WHERE r.session_id = s.session_id) AS resources
        FROM session s
        LEFT JOIN document d ON d.session_id = s.session_id
        WHERE (?1 IS NULL OR s.name = ?1)
        ORDER BY s.session_id
        "#,
    )
    .bind(session)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            let chars: Option<i64> = r.get("char_count");
            SessionSnapshot {
                session: r.get("name"),
                ingested: chars.is_some(),
                chars,
                words: r.get("word_count"),
                has_summary: r.get("has_summary"),
                qa_pairs: r.get("qa_pairs"),
                vocab_terms: r.get("vocab_terms"),
                quiz_questions: r.get("quiz_questions"),
                has_plan: r.get("has_plan"),
                resources: r.get("resources"),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_reflects_pipeline_progress() {
        let pool = crate::store::memory_pool().await.unwrap();
        let session_id = crate::store::ensure_session(&pool, "bio").await.unwrap();
        crate::ingest::db::replace_document(&pool, session_id, "text", None, "cells divide")
            .await
            .unwrap();
        crate::summarize::db::upsert_summary(&pool, session_id, "cells divide a lot", 1, 0, None)
            .await
            .unwrap();
        crate::vocab::db::replace_terms(
            &pool,
            session_id,
            &[("mitosis".to_string(), "cell division".to_string())],
        )
        .await
        .unwrap();

        let snaps = snapshot(&pool, None).await.unwrap();
        assert_eq!(snaps.len(), 1);
        let s = &snaps[0];
        assert_eq!(s.session, "bio");
        assert!(s.ingested);
        assert!(s.has_summary);
        assert_eq!(s.vocab_terms, 1);
        assert_eq!(s.quiz_questions, 0);
        assert!(!s.has_plan);
    }

    #[tokio::test]
    async fn filter_by_name_misses_politely() {
        let pool = crate::store::memory_pool().await.unwrap();
        crate::store::ensure_session(&pool, "bio").await.unwrap();
        let snaps = snapshot(&pool, Some("chem")).await.unwrap();
        assert!(snaps.is_empty());
    }
}
