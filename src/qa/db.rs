use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct QaRow {
    pub question: String,
    pub answer: String,
}

pub async fn insert_qa(
    pool: &SqlitePool,
    session_id: i64,
    question: &str,
    answer: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO qa_pair (session_id, question, answer, asked_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(session_id)
    .bind(question)
    .bind(answer)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_qa_pairs(pool: &SqlitePool, session_id: i64) -> Result<Vec<QaRow>> {
    let rows = sqlx::query(
        "SELECT question, answer FROM qa_pair WHERE session_id = ?1 ORDER BY qa_id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| QaRow { question: r.get("question"), answer: r.get("answer") })
        .collect())
}
