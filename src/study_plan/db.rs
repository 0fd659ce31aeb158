use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct PlanRow {
    pub topic: String,
    pub hours_per_day: i64,
    pub goal: String,
    pub content: String,
}

pub async fn upsert_plan(
    pool: &SqlitePool,
    session_id: i64,
    topic: &str,
    hours_per_day: u8,
    goal: &str,
    content: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO study_plan (session_id, topic, hours_per_day, goal, content, generated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (session_id) DO UPDATE
          SET topic         = excluded.topic,
              hours_per_day = excluded.hours_per_day,
              goal          = excluded.goal,
              content       = excluded.content,
              generated_at  = excluded.generated_at
        "#,
    )
    .bind(session_id)
    .bind(topic)
    .bind(hours_per_day as i64)
    .bind(goal)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_plan(pool: &SqlitePool, session_id: i64) -> Result<Option<PlanRow>> {
    let row = sqlx::query(
        "SELECT topic, hours_per_day, goal, content FROM study_plan WHERE session_id = ?1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| PlanRow {
        topic: r.get("topic"),
        hours_per_day: r.get("hours_per_day"),
        goal: r.get("goal"),
        content: r.get("content"),
    }))
}
