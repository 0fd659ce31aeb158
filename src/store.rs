use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

pub const DEFAULT_DB_PATH: &str = "study.db";

pub fn resolve_db_path(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("STUDY_DB").ok())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

/// Open the SQLite store. Only `init` is allowed to create the file; every
/// other command expects an initialized store.
pub async fn connect(path: &str, create: bool) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))
        .with_context(|| format!("invalid store path: {path}"))?
        .create_if_missing(create)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("open store '{path}' — run `study init` first?"))?;
    Ok(pool)
}

pub async fn session_id(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    let row = sqlx::query("SELECT session_id FROM session WHERE name = ?1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<i64, _>("session_id")))
}

/// Find or create the named session.
pub async fn ensure_session(pool: &SqlitePool, name: &str) -> Result<i64> {
    if let Some(id) = session_id(pool, name).await? {
        return Ok(id);
    }
    let row = sqlx::query(
        "INSERT INTO session (name, created_at) VALUES (?1, ?2) RETURNING session_id",
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row.get::<i64, _>("session_id"))
}

/// Session that must already exist (everything downstream of ingest).
pub async fn require_session(pool: &SqlitePool, name: &str) -> Result<i64> {
    session_id(pool, name)
        .await?
        .with_context(|| format!("no session named '{name}' — run `study ingest` first"))
}

/// Single-connection in-memory store with the schema applied; test-only.
#[cfg(test)]
pub async fn memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

pub struct DocumentRow {
    pub source_kind: String,
    pub source_ref: Option<String>,
    pub text_clean: String,
    pub char_count: i64,
    pub word_count: i64,
}

pub async fn fetch_document(pool: &SqlitePool, session_id: i64) -> Result<Option<DocumentRow>> {
    let row = sqlx::query(
        r#"
        SELECT source_kind, source_ref, text_clean, char_count, word_count
        FROM document
        WHERE session_id = ?1
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| DocumentRow {
        source_kind: r.get("source_kind"),
        source_ref: r.get("source_ref"),
        text_clean: r.get("text_clean"),
        char_count: r.get("char_count"),
        word_count: r.get("word_count"),
    }))
}

/// Document that must already exist for the op to make sense.
pub async fn require_document(pool: &SqlitePool, session_id: i64, session: &str) -> Result<DocumentRow> {
    fetch_document(pool, session_id)
        .await?
        .with_context(|| format!("session '{session}' has no ingested document — run `study ingest` first"))
}

pub async fn fetch_summary(pool: &SqlitePool, session_id: i64) -> Result<Option<String>> {
    let row = sqlx::query("SELECT content FROM summary WHERE session_id = ?1")
        .bind(session_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<String, _>("content")))
}
