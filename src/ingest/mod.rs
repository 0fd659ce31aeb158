use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use reqwest::Client;
use sqlx::SqlitePool;
use thiserror::Error;
use url::Url;

use crate::llm::transcribe::{TranscribeError, TranscriptionClient};
use crate::store;
use crate::telemetry::ops::ingest::Phase as IngestPhase;
use crate::telemetry::{self};
use crate::util::text;

pub(crate) mod db;
mod file;
mod media;
mod types;
mod web;

#[derive(Args)]
pub struct IngestCmd {
    /// Session to ingest into (created if missing)
    #[arg(long, default_value = "default")] pub session: String,
    /// Document to read: txt, md, pdf, docx, or audio (mp3, wav, m4a)
    #[arg(long)] pub file: Option<PathBuf>,
    /// Web article or video URL
    #[arg(long)] pub url: Option<String>,
    /// Paste text directly
    #[arg(long)] pub text: Option<String>,
    /// Read pasted text from stdin
    #[arg(long, default_value_t = false)] pub stdin: bool,
    #[arg(long, default_value_t = false)] pub apply: bool,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),
    #[error("source produced no usable text")]
    EmptySource,
    #[error("no transcript available for this video")]
    NoTranscriptAvailable,
    #[error("extracting {format}: {message}")]
    Parse { format: &'static str, message: String },
    #[error("reading source: {0}")]
    Io(#[from] std::io::Error),
    #[error("fetching source: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
}

/// Resolved input source. Exactly one per invocation; extraction never
/// partially ingests: either the full text lands or nothing is written.
pub enum Source {
    File(PathBuf),
    Web(Url),
    Media(Url),
    Inline(String),
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::File(_) => "file",
            Source::Web(_) => "web",
            Source::Media(_) => "media",
            Source::Inline(_) => "text",
        }
    }

    pub fn reference(&self) -> Option<String> {
        match self {
            Source::File(path) => Some(path.display().to_string()),
            Source::Web(url) | Source::Media(url) => Some(url.to_string()),
            Source::Inline(_) => None,
        }
    }
}

pub async fn run(pool: &SqlitePool, args: IngestCmd) -> Result<()> {
    let log = telemetry::ingest();
    let _g = log
        .root_span_kv([
            ("session", args.session.clone()),
            ("apply", args.apply.to_string()),
        ])
        .entered();

    let source = {
        let _s = log.span(&IngestPhase::Resolve).entered();
        resolve_source(&args)?
    };

    if !args.apply {
        let _s = log.span(&IngestPhase::Plan).entered();
        let strategies = match &source {
            Source::Media(_) => Some(
                media::STRATEGY_CHAIN.iter().map(|s| s.name()).collect::<Vec<_>>(),
            ),
            _ => None,
        };
        log.info(format!(
            "📝 Ingest plan — session={} kind={} source={}",
            args.session,
            source.kind(),
            source.reference().unwrap_or_else(|| "(inline)".into()),
        ));
        if let Some(names) = &strategies {
            log.info(format!("   transcript strategies, in order: {}", names.join(" → ")));
        }
        log.info("   Use --apply to execute.");
        if telemetry::config::json_mode() {
            let plan = types::IngestPlan {
                session: &args.session,
                kind: source.kind(),
                source: source.reference(),
                strategies,
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let raw = {
        let _s = log.span_kv(
            &IngestPhase::Extract,
            [("kind", source.kind().to_string())],
        )
        .entered();
        extract(&log, &source).await?
    };

    let clean = raw.trim();
    if clean.is_empty() {
        return Err(ExtractError::EmptySource).context("nothing to ingest");
    }
    let chars = clean.chars().count();
    let words = text::word_count(clean);

    let _w = log.span(&IngestPhase::WriteDoc).entered();
    let session_id = store::ensure_session(pool, &args.session).await?;
    db::replace_document(pool, session_id, source.kind(), source.reference().as_deref(), clean)
        .await?;
    drop(_w);

    log.ingested(&args.session, source.kind(), chars, words);

    if telemetry::config::json_mode() {
        let result = types::IngestResult {
            session: &args.session,
            kind: source.kind(),
            source: source.reference(),
            chars,
            words,
        };
        log.result(&result)?;
    }
    Ok(())
}

fn resolve_source(args: &IngestCmd) -> Result<Source> {
    let mut picked: Vec<Source> = Vec::new();

    if let Some(path) = &args.file {
        picked.push(Source::File(path.clone()));
    }
    if let Some(raw) = &args.url {
        let url = Url::parse(raw).with_context(|| format!("invalid URL: {raw}"))?;
        if is_media_host(&url) {
            picked.push(Source::Media(url));
        } else {
            picked.push(Source::Web(url));
        }
    }
    if let Some(text) = &args.text {
        picked.push(Source::Inline(text.clone()));
    }
    if args.stdin {
        let mut buf = String::new();
        use std::io::Read;
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        picked.push(Source::Inline(buf));
    }

    match picked.len() {
        0 => bail!("no input: pass one of --file, --url, --text, --stdin"),
        1 => Ok(picked.into_iter().next().expect("length checked")),
        n => bail!("got {n} inputs; pass exactly one of --file, --url, --text, --stdin"),
    }
}

fn is_media_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.trim_start_matches("www.");
            host == "youtube.com" || host == "m.youtube.com" || host == "youtu.be"
        }
        None => false,
    }
}

async fn extract(
    log: &telemetry::ctx::LogCtx<crate::telemetry::ops::ingest::Ingest>,
    source: &Source,
) -> Result<String, ExtractError> {
    match source {
        Source::Inline(text) => Ok(text.clone()),
        Source::File(path) => {
            if file::is_audio(path) {
                let _t = log.span(&IngestPhase::Transcribe).entered();
                let transcriber = TranscriptionClient::from_env()?;
                log.info("🎙️ Transcribing audio file");
                transcriber.transcribe_file(path).await.map_err(ExtractError::from)
            } else {
                file::extract_document(path)
            }
        }
        Source::Web(url) => {
            let client = Client::new();
            web::extract(&client, url).await
        }
        Source::Media(url) => {
            let _t = log.span(&IngestPhase::Transcribe).entered();
            let client = Client::new();
            let transcriber = TranscriptionClient::from_env()?;
            media::extract(&client, &transcriber, url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> IngestCmd {
        IngestCmd {
            session: "default".into(),
            file: None,
            url: None,
            text: None,
            stdin: false,
            apply: false,
        }
    }

    #[test]
    fn rejects_zero_inputs() {
        assert!(resolve_source(&cmd()).is_err());
    }

    #[test]
    fn rejects_multiple_inputs() {
        let mut args = cmd();
        args.text = Some("abc".into());
        args.file = Some(PathBuf::from("notes.txt"));
        assert!(resolve_source(&args).is_err());
    }

    #[test]
    fn youtube_urls_resolve_to_media() {
        for raw in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
        ] {
            let mut args = cmd();
            args.url = Some(raw.into());
            let source = resolve_source(&args).unwrap();
            assert_eq!(source.kind(), "media", "{raw}");
        }
    }

    #[test]
    fn plain_urls_resolve_to_web() {
        let mut args = cmd();
        args.url = Some("https://example.com/article".into());
        assert_eq!(resolve_source(&args).unwrap().kind(), "web");
    }

    #[test]
    fn inline_text_has_no_reference() {
        let mut args = cmd();
        args.text = Some("pasted".into());
        let source = resolve_source(&args).unwrap();
        assert_eq!(source.kind(), "text");
        assert!(source.reference().is_none());
    }
}
