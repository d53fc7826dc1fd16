use crate::error::ChainError;
use crate::models::CompletionQuery;
use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionModel};
use rig::providers::{anthropic, gemini, openai};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Anthropic's API refuses requests without an output limit. 4096 is the
/// largest value every Claude model accepts.
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model_name: String,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: u64,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

/// Sends one prompt to a completion endpoint and returns the raw reply text.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        query: &'a CompletionQuery,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChainError>> + Send + 'a>>;
    fn get_model_name(&self) -> &str;
    fn get_timeout(&self) -> Duration;
}

impl LlmConfig {
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            api_key: None,
            api_base: None,
            timeout_seconds: 60,
            max_tokens: None,
            temperature: 0.0,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

pub struct RigCompletionClient {
    config: LlmConfig,
    provider: RigProvider,
}

enum RigProvider {
    OpenAI(openai::Client),
    Anthropic(anthropic::Client),
    Gemini(gemini::Client),
    Compatible(CompatibleEndpoint),
}

/// Any server speaking the OpenAI chat-completions wire format.
struct CompatibleEndpoint {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

impl RigCompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self, ChainError> {
        let provider = create_provider(&config)?;
        Ok(Self { config, provider })
    }

    async fn make_api_request(&self, query: &CompletionQuery) -> Result<String, ChainError> {
        match &self.provider {
            RigProvider::OpenAI(client) => {
                let model = client.completion_model(&query.model);
                self.send_completion_request(model, query, self.config.max_tokens)
                    .await
            }
            RigProvider::Anthropic(client) => {
                let model = client.completion_model(&query.model);
                let max_tokens = self
                    .config
                    .max_tokens
                    .unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS);
                self.send_completion_request(model, query, Some(max_tokens))
                    .await
            }
            RigProvider::Gemini(client) => {
                let model = client.completion_model(&query.model);
                self.send_completion_request(model, query, self.config.max_tokens)
                    .await
            }
            RigProvider::Compatible(endpoint) => self.send_compatible_request(endpoint, query).await,
        }
    }

    async fn send_completion_request<M: CompletionModel>(
        &self,
        model: M,
        query: &CompletionQuery,
        max_tokens: Option<u32>,
    ) -> Result<String, ChainError> {
        let mut builder = model.completion_request(query.prompt.as_str());

        // Reasoning models reject an explicit temperature
        if accepts_temperature(&query.model) {
            builder = builder.temperature(self.config.temperature as f64);
        }

        if let Some(max_tokens) = max_tokens {
            builder = builder.max_tokens(max_tokens as u64);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ChainError::LlmClientError(format!("Request failed: {}", e)))?;

        let mut extracted_text = String::new();
        for content in response.choice.iter() {
            if let AssistantContent::Text(text_content) = content {
                extracted_text.push_str(&text_content.text);
            }
        }

        Ok(extracted_text)
    }

    async fn send_compatible_request(
        &self,
        endpoint: &CompatibleEndpoint,
        query: &CompletionQuery,
    ) -> Result<String, ChainError> {
        let body = build_chat_request(&self.config, query);

        let mut request = endpoint.http.post(&endpoint.url).json(&body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChainError::ProviderStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChainError::InvalidResponse("reply has no message content".to_string()))
    }
}

impl CompletionProvider for RigCompletionClient {
    fn complete<'a>(
        &'a self,
        query: &'a CompletionQuery,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChainError>> + Send + 'a>> {
        Box::pin(async move {
            let start_time = std::time::Instant::now();
            let reply = self.make_api_request(query).await?;

            debug!(
                model = %query.model,
                duration_ms = start_time.elapsed().as_millis() as u64,
                reply_len = reply.len(),
                "completion received"
            );

            Ok(reply)
        })
    }

    fn get_model_name(&self) -> &str {
        &self.config.model_name
    }

    fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }
}

fn create_provider(config: &LlmConfig) -> Result<RigProvider, ChainError> {
    let model_name = config.model_name.trim();

    if let Some(ref base) = config.api_base {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        return Ok(RigProvider::Compatible(CompatibleEndpoint {
            http,
            url: chat_completions_url(base),
        }));
    }

    if is_openai_model(model_name) {
        let api_key = require_api_key(config, "OpenAI")?;
        Ok(RigProvider::OpenAI(openai::Client::new(api_key)))
    } else if is_claude_model(model_name) {
        let api_key = require_api_key(config, "Anthropic")?;
        Ok(RigProvider::Anthropic(anthropic::Client::new(api_key)))
    } else if is_gemini_model(model_name) {
        let api_key = require_api_key(config, "Gemini")?;
        Ok(RigProvider::Gemini(gemini::Client::new(api_key)))
    } else {
        Err(ChainError::LlmClientError(format!(
            "Unsupported model '{}'. Use OpenAI (gpt-*), Anthropic (claude-*), Gemini (gemini-*) models, or set an API base for an OpenAI-compatible server",
            model_name
        )))
    }
}

fn require_api_key<'a>(config: &'a LlmConfig, provider: &str) -> Result<&'a str, ChainError> {
    config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ChainError::LlmClientError(format!("{} API key not found", provider)))
}

pub fn create_completion_client(
    config: LlmConfig,
) -> Result<Box<dyn CompletionProvider + Send + Sync>, ChainError> {
    let client = RigCompletionClient::new(config)?;
    Ok(Box::new(client))
}

/// The prompt is the only message. No output limit is sent unless configured.
fn build_chat_request<'a>(config: &LlmConfig, query: &'a CompletionQuery) -> ChatRequest<'a> {
    ChatRequest {
        model: &query.model,
        messages: vec![ChatMessage {
            role: "user",
            content: &query.prompt,
        }],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

fn chat_completions_url(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

fn accepts_temperature(model: &str) -> bool {
    let candidate = model.strip_prefix("openai/").unwrap_or(model);
    !["gpt-5", "o1", "o3", "o4"]
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
}

pub fn is_openai_model(model: &str) -> bool {
    let candidate = model.strip_prefix("openai/").unwrap_or(model);
    let candidate = candidate.strip_prefix("ft:").unwrap_or(candidate);

    candidate.starts_with("gpt-")
        || candidate.starts_with("chatgpt-")
        || candidate.starts_with("o1")
        || candidate.starts_with("o3")
        || candidate.starts_with("o4")
}

pub fn is_claude_model(model: &str) -> bool {
    let candidate = model.strip_prefix("anthropic/").unwrap_or(model);
    candidate.starts_with("claude-")
}

pub fn is_gemini_model(model: &str) -> bool {
    let candidate = model.strip_prefix("gemini/").unwrap_or(model);
    candidate.starts_with("gemini-")
}
