use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::store;
use crate::telemetry::ops::flashcards::Phase as FlashcardsPhase;
use crate::telemetry::{self};
use crate::vocab;

mod types;

#[derive(Args)]
pub struct FlashcardsCmd {
    #[arg(long, default_value = "default")]
    pub session: String,
    /// Output CSV path
    #[arg(long, default_value = "flashcards.csv")]
    pub out: PathBuf,
}

#[derive(Serialize)]
struct FlashcardRecord<'a> {
    #[serde(rename = "Term")]
    term: &'a str,
    #[serde(rename = "Definition")]
    definition: &'a str,
}

pub async fn run(pool: &SqlitePool, args: FlashcardsCmd) -> Result<()> {
    let log = telemetry::flashcards();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("out", args.out.display().to_string()),
        ])
        .entered();

    let _load = log.span(&FlashcardsPhase::LoadTerms).entered();
    let session_id = store::require_session(pool, &args.session).await?;
    let terms = vocab::db::fetch_terms(pool, session_id).await?;
    drop(_load);
    if terms.is_empty() {
        anyhow::bail!(
            "session '{}' has no vocabulary — run `study vocab` first",
            args.session
        );
    }

    let _w = log.span(&FlashcardsPhase::WriteCsv).entered();
    write_cards(&args.out, &terms)
        .with_context(|| format!("write flashcards to {}", args.out.display()))?;
    drop(_w);

    log.info(format!(
        "✅ Wrote {} flashcard(s) to {}",
        terms.len(),
        args.out.display()
    ));

    if telemetry::config::json_mode() {
        let result = types::FlashcardsResult {
            session: &args.session,
            cards: terms.len(),
            path: args.out.display().to_string(),
        };
        log.result(&result)?;
    }
    Ok(())
}

fn write_cards(path: &std::path::Path, terms: &[vocab::db::TermRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in terms {
        writer.serialize(FlashcardRecord {
            term: &row.term,
            definition: &row.explanation,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::db::TermRow;

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.csv");

        let terms = vec![
            TermRow { term: "osmosis".into(), explanation: "diffusion of water".into() },
            TermRow { term: "mitosis".into(), explanation: "cell division".into() },
        ];
        write_cards(&path, &terms).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Term,Definition"));
        assert_eq!(lines.next(), Some("osmosis,diffusion of water"));
        assert_eq!(lines.next(), Some("mitosis,cell division"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.csv");

        let terms =
            vec![TermRow { term: "enzyme".into(), explanation: "a catalyst, biological".into() }];
        write_cards(&path, &terms).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"a catalyst, biological\""));
    }
}
