use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::types::Resource;

pub async fn replace_resources(
    pool: &SqlitePool,
    session_id: i64,
    resources: &[Resource],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM resource WHERE session_id = ?1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    for r in resources {
        sqlx::query(
            r#"
            INSERT INTO resource (session_id, title, link, summary, source, fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(session_id)
        .bind(&r.title)
        .bind(&r.link)
        .bind(&r.summary)
        .bind(&r.source)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn fetch_resources(pool: &SqlitePool, session_id: i64) -> Result<Vec<Resource>> {
    let rows = sqlx::query(
        "SELECT title, link, summary, source FROM resource WHERE session_id = ?1 ORDER BY resource_id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Resource {
            title: r.get("title"),
            link: r.get("link"),
            summary: r.get("summary"),
            source: r.get("source"),
        })
        .collect())
}
