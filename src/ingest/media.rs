use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::llm::transcribe::TranscriptionClient;

use super::ExtractError;

/// Transcript strategies, tried in order until one yields text. Each returns
/// result-or-nothing; an error inside a strategy degrades to nothing so the
/// next one still gets its turn.
#[derive(Clone, Copy, Debug)]
pub enum TranscriptStrategy {
    CaptionTrack,
    DownloadAndTranscribe,
}

pub const STRATEGY_CHAIN: [TranscriptStrategy; 2] =
    [TranscriptStrategy::CaptionTrack, TranscriptStrategy::DownloadAndTranscribe];

impl TranscriptStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptStrategy::CaptionTrack => "caption-track",
            TranscriptStrategy::DownloadAndTranscribe => "download-and-transcribe",
        }
    }
}

pub async fn extract(
    client: &Client,
    transcriber: &TranscriptionClient,
    url: &Url,
) -> Result<String, ExtractError> {
    for strategy in STRATEGY_CHAIN {
        let attempt = match strategy {
            TranscriptStrategy::CaptionTrack => caption_track(client, url).await,
            TranscriptStrategy::DownloadAndTranscribe => {
                download_and_transcribe(transcriber, url).await
            }
        };
        match attempt {
            Ok(Some(text)) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => debug!(strategy = strategy.name(), "no transcript from strategy"),
            Err(err) => warn!(strategy = strategy.name(), error = %err, "strategy failed"),
        }
    }
    Err(ExtractError::NoTranscriptAvailable)
}

async fn caption_track(client: &Client, url: &Url) -> Result<Option<String>, ExtractError> {
    let Some(id) = video_id(url) else {
        return Ok(None);
    };

    let endpoint = Url::parse_with_params(
        "https://video.google.com/timedtext",
        &[("lang", "en"), ("v", id.as_str())],
    )
    .map_err(|e| ExtractError::Parse { format: "caption-url", message: e.to_string() })?;

    let body = client.get(endpoint).send().await?.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(parse_timedtext(&body))
}

// yt-dlp does the media fetching when installed; without it this strategy is
// simply unavailable rather than an error.
async fn download_and_transcribe(
    transcriber: &TranscriptionClient,
    url: &Url,
) -> Result<Option<String>, ExtractError> {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("audio.%(ext)s");

    let status = tokio::process::Command::new("yt-dlp")
        .arg("--quiet")
        .arg("-f")
        .arg("bestaudio")
        .arg("-o")
        .arg(&template)
        .arg(url.as_str())
        .status()
        .await;

    let status = match status {
        Ok(s) => s,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("yt-dlp not on PATH, download strategy unavailable");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    if !status.success() {
        return Ok(None);
    }

    let Some(audio) = first_file_in(dir.path())? else {
        return Ok(None);
    };
    let text = transcriber.transcribe_file(&audio).await?;
    if text.trim().is_empty() { Ok(None) } else { Ok(Some(text)) }
}

fn first_file_in(dir: &std::path::Path) -> Result<Option<std::path::PathBuf>, std::io::Error> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

pub(crate) fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.");
    if host == "youtu.be" {
        return url
            .path_segments()
            .and_then(|mut segs| segs.next().map(str::to_string))
            .filter(|s| !s.is_empty());
    }
    if host.ends_with("youtube.com") {
        return url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned());
    }
    None
}

fn parse_timedtext(xml: &str) -> Option<String> {
    let re = Regex::new(r"(?s)<text[^>]*>(.*?)</text>").ok()?;
    let mut lines: Vec<String> = Vec::new();
    for cap in re.captures_iter(xml) {
        let line = unescape(cap[1].trim());
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() { None } else { Some(lines.join(" ")) }
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url_yields_video_id() {
        let url = Url::parse("https://www.youtube.com/watch?v=abc123&t=10s").unwrap();
        assert_eq!(video_id(&url).as_deref(), Some("abc123"));
    }

    #[test]
    fn short_url_yields_video_id() {
        let url = Url::parse("https://youtu.be/xyz789").unwrap();
        assert_eq!(video_id(&url).as_deref(), Some("xyz789"));
    }

    #[test]
    fn non_video_url_yields_none() {
        let url = Url::parse("https://example.com/watch?v=abc").unwrap();
        assert!(video_id(&url).is_none());
    }

    #[test]
    fn timedtext_lines_joined_and_unescaped() {
        let xml = r#"<transcript><text start="0.0" dur="2.1">Hello &amp; welcome</text><text start="2.1" dur="1.4">to the course</text></transcript>"#;
        assert_eq!(
            parse_timedtext(xml).as_deref(),
            Some("Hello & welcome to the course")
        );
    }

    #[test]
    fn empty_timedtext_yields_none() {
        assert!(parse_timedtext("<transcript></transcript>").is_none());
    }
}
