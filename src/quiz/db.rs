use anyhow::Result;
use sqlx::{Row, SqlitePool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Mcq,
    FillBlank,
}

impl QuestionKind {
    fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::FillBlank => "fill_blank",
        }
    }

    fn from_str(s: &str) -> Self {
        match s {
            "mcq" => QuestionKind::Mcq,
            _ => QuestionKind::FillBlank,
        }
    }
}

pub struct QuestionRow {
    pub term: String,
    pub kind: QuestionKind,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

pub async fn replace_questions(
    pool: &SqlitePool,
    session_id: i64,
    questions: &[QuestionRow],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM quiz_question WHERE session_id = ?1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    for q in questions {
        sqlx::query(
            r#"
            INSERT INTO quiz_question (session_id, term, kind, question, options, answer)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(session_id)
        .bind(&q.term)
        .bind(q.kind.as_str())
        .bind(&q.question)
        .bind(serde_json::to_string(&q.options)?)
        .bind(&q.answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn fetch_questions(pool: &SqlitePool, session_id: i64) -> Result<Vec<QuestionRow>> {
    let rows = sqlx::query(
        r#"
        SELECT term, kind, question, options, answer
        FROM quiz_question
        WHERE session_id = ?1
        ORDER BY question_id
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        let options: Vec<String> =
            serde_json::from_str(&r.get::<String, _>("options")).unwrap_or_default();
        out.push(QuestionRow {
            term: r.get("term"),
            kind: QuestionKind::from_str(&r.get::<String, _>("kind")),
            question: r.get("question"),
            options,
            answer: r.get("answer"),
        });
    }
    Ok(out)
}
