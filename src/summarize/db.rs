use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn upsert_summary(
    pool: &SqlitePool,
    session_id: i64,
    content: &str,
    chunk_count: usize,
    skipped_chunks: usize,
    model: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO summary (session_id, content, chunk_count, skipped_chunks, model, generated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (session_id) DO UPDATE
          SET content        = excluded.content,
              chunk_count    = excluded.chunk_count,
              skipped_chunks = excluded.skipped_chunks,
              model          = excluded.model,
              generated_at   = excluded.generated_at
        "#,
    )
    .bind(session_id)
    .bind(content)
    .bind(chunk_count as i64)
    .bind(skipped_chunks as i64)
    .bind(model)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}
