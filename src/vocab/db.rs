use anyhow::Result;
use sqlx::{Row, SqlitePool};

pub struct TermRow {
    pub term: String,
    pub explanation: String,
}

/// Replace the session's vocabulary wholesale; terms are positional.
pub async fn replace_terms(
    pool: &SqlitePool,
    session_id: i64,
    terms: &[(String, String)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM vocab_term WHERE session_id = ?1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    for (position, (term, explanation)) in terms.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO vocab_term (session_id, position, term, explanation)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (session_id, term) DO UPDATE
              SET explanation = excluded.explanation, position = excluded.position
            "#,
        )
        .bind(session_id)
        .bind(position as i64)
        .bind(term)
        .bind(explanation)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn fetch_terms(pool: &SqlitePool, session_id: i64) -> Result<Vec<TermRow>> {
    let rows = sqlx::query(
        "SELECT term, explanation FROM vocab_term WHERE session_id = ?1 ORDER BY position",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| TermRow { term: r.get("term"), explanation: r.get("explanation") })
        .collect())
}
