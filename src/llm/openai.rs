use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TOP_P: f32 = 1.0;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ModelClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub default_temperature: f32,
    pub default_top_p: f32,
    pub timeout: Duration,
}

impl Default for ModelClientConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            default_temperature: DEFAULT_TEMPERATURE,
            default_top_p: DEFAULT_TOP_P,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ModelClientConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            cfg.base_url = base;
        }
        if let Ok(temp) = std::env::var("OPENAI_TEMPERATURE") {
            if let Ok(parsed) = temp.parse::<f32>() {
                cfg.default_temperature = parsed;
            }
        }
        if let Ok(top_p) = std::env::var("OPENAI_TOP_P") {
            if let Ok(parsed) = top_p.parse::<f32>() {
                cfg.default_top_p = parsed;
            }
        }
        if let Ok(timeout) = std::env::var("OPENAI_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.timeout = Duration::from_secs(parsed);
            }
        }
        cfg
    }
}

/// Long-lived chat-completion handle. Built once at startup and injected into
/// every command that talks to the model.
#[derive(Clone)]
pub struct OpenAiClient {
    http: HttpClient,
    cfg: ModelClientConfig,
}

impl OpenAiClient {
    pub fn new(cfg: ModelClientConfig) -> Result<Self, ModelError> {
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(ModelError::http)?;
        Ok(Self { http, cfg })
    }

    fn resolve_api_key(&self) -> Result<String, ModelError> {
        if let Some(key) = &self.cfg.api_key {
            return Ok(key.clone());
        }
        std::env::var("OPENAI_API_KEY").map_err(|_| ModelError::MissingApiKey)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }

    fn build_api_request(&self, req: &ChatCompletionRequest) -> ApiChatCompletionRequest {
        ApiChatCompletionRequest {
            model: req
                .model
                .clone()
                .unwrap_or_else(|| self.cfg.default_model.clone()),
            temperature: req.temperature.unwrap_or(self.cfg.default_temperature),
            top_p: req.top_p.unwrap_or(self.cfg.default_top_p),
            max_tokens: req.max_tokens,
            messages: req
                .messages
                .iter()
                .map(|m| ApiChatMessage {
                    role: m.role.as_api_str().to_string(),
                    content: Some(m.content.clone()),
                })
                .collect(),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError>;
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError> {
        if request.messages.is_empty() {
            return Err(ModelError::EmptyMessages);
        }

        let api_key = self.resolve_api_key()?;
        let api_request = self.build_api_request(&request);
        let endpoint = self.endpoint();

        let response = self
            .http
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(ModelError::http)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ModelError::http)?;

        if !status.is_success() {
            let api_err = serde_json::from_slice::<ApiErrorEnvelope>(&bytes)
                .ok()
                .map(|env| env.error);
            return Err(ModelError::Api {
                status,
                error: api_err.unwrap_or_default(),
            });
        }

        let parsed: ApiChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(ModelError::Decode)?;

        // Never trust the envelope blindly: an answer must actually be there.
        let content = parsed
            .choices
            .iter()
            .find_map(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or(ModelError::InvalidResponse("response carried no message content"))?;

        Ok(ChatCompletionResponse {
            content,
            usage: parsed.usage.map(|usage| UsageMetrics {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl ChatCompletionRequest {
    /// Single-user-message request, the common case for the study prompts.
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            messages: vec![ChatMessage::new(ChatRole::User, prompt)],
            max_tokens: None,
            temperature: None,
            top_p: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    fn as_api_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatCompletionResponse {
    pub content: String,
    pub usage: Option<UsageMetrics>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsageMetrics {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug)]
pub enum ModelError {
    MissingApiKey,
    EmptyMessages,
    Http(reqwest::Error),
    Timeout,
    Api { status: StatusCode, error: ApiErrorBody },
    InvalidResponse(&'static str),
    MockQueueEmpty,
    Decode(serde_json::Error),
}

impl ModelError {
    fn http(err: reqwest::Error) -> Self {
        if err.is_timeout() { ModelError::Timeout } else { ModelError::Http(err) }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Timeout => true,
            ModelError::Http(_) => true,
            ModelError::Api { status, .. } => status.is_server_error(),
            ModelError::MissingApiKey
            | ModelError::EmptyMessages
            | ModelError::InvalidResponse(_)
            | ModelError::MockQueueEmpty
            | ModelError::Decode(_) => false,
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::MissingApiKey => write!(f, "OPENAI_API_KEY is not set"),
            ModelError::EmptyMessages => {
                write!(f, "chat completion requires at least one message")
            }
            ModelError::Http(err) => write!(f, "http error: {err}"),
            ModelError::Timeout => write!(f, "request timed out"),
            ModelError::Api { status, error } => {
                write!(f, "api error {status}: {}", error.message)
            }
            ModelError::InvalidResponse(reason) => {
                write!(f, "invalid model response: {reason}")
            }
            ModelError::MockQueueEmpty => write!(f, "mock client response queue is empty"),
            ModelError::Decode(err) => write!(f, "decode error: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Http(err) => Some(err),
            ModelError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl Default for ApiErrorBody {
    fn default() -> Self {
        Self { message: "unknown error".to_string(), r#type: None, param: None, code: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

/// Queue-backed stand-in used by command and aggregator tests.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<ChatCompletionResponse, ModelError>>>,
    calls: Mutex<Vec<ChatCompletionRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_content(&self, content: impl Into<String>) {
        self.push_response(Ok(ChatCompletionResponse { content: content.into(), usage: None }));
    }

    pub fn push_response(&self, resp: Result<ChatCompletionResponse, ModelError>) {
        self.responses.lock().unwrap().push_back(resp);
    }

    pub fn calls(&self) -> Vec<ChatCompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::MockQueueEmpty))
    }
}

#[derive(Debug, Clone, Serialize)]
struct ApiChatCompletionRequest {
    model: String,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: Vec<ApiChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiChatCompletionResponse {
    choices: Vec<ApiChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiChatChoice {
    message: ApiChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}
