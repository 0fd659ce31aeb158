use std::path::Path;
use std::time::Duration;

use reqwest::Client as HttpClient;
use reqwest::multipart;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TRANSCRIBE_MODEL: &str = "whisper-1";
// Transcription of long recordings runs well past chat latencies.
const DEFAULT_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned status {status}: {body}")]
    Server { status: u16, body: String },
    #[error("reading audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Wrapper around the `audio/transcriptions` endpoint of an OpenAI-compatible
/// server. Backs audio-file and downloaded-media ingestion.
pub struct TranscriptionClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl TranscriptionClient {
    pub fn from_env() -> Result<Self, TranscribeError> {
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("STUDY_TRANSCRIBE_MODEL")
            .unwrap_or_else(|_| DEFAULT_TRANSCRIBE_MODEL.to_string());
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model,
        })
    }

    pub async fn transcribe_file(&self, path: &Path) -> Result<String, TranscribeError> {
        let api_key = self.api_key.clone().ok_or(TranscribeError::MissingApiKey)?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let endpoint = format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscribeError::Server { status: status.as_u16(), body });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}
