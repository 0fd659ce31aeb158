use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::util::text;

/// Write the session's document, replacing any prior one. Derived artifacts
/// describe the replaced text, so they are cleared in the same transaction.
pub async fn replace_document(
    pool: &SqlitePool,
    session_id: i64,
    source_kind: &str,
    source_ref: Option<&str>,
    text_clean: &str,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    for table in ["summary", "qa_pair", "vocab_term", "quiz_question", "resource", "study_plan"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE session_id = ?1"))
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
    }

    let row = sqlx::query(
        r#"
        INSERT INTO document (session_id, source_kind, source_ref, text_clean,
            char_count, word_count, ingested_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT (session_id) DO UPDATE
          SET source_kind = excluded.source_kind,
              source_ref  = excluded.source_ref,
              text_clean  = excluded.text_clean,
              char_count  = excluded.char_count,
              word_count  = excluded.word_count,
              ingested_at = excluded.ingested_at
        RETURNING doc_id
        "#,
    )
    .bind(session_id)
    .bind(source_kind)
    .bind(source_ref)
    .bind(text_clean)
    .bind(text_clean.chars().count() as i64)
    .bind(text::word_count(text_clean) as i64)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row.get::<i64, _>("doc_id"))
}
