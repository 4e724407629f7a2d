//! Chat completion client with traffic logging.

use crate::config::OpenAiSettings;
use crate::error::{HeimdallError, Result};
use crate::logging::log_exchange;
use crate::traffic::{CapturedRequest, CapturedResponse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, Level};
use url::Url;

/// Default timeout for API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// A chat message as sent to and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Client for the chat completions endpoint.
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl CompletionClient {
    /// Create a client from settings, failing when no API key is available.
    pub fn from_settings(settings: &OpenAiSettings) -> Result<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            HeimdallError::Config(format!(
                "No API key configured. Set openai.api_key or {}.",
                crate::config::API_KEY_ENV
            ))
        })?;
        let timeout = match settings.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        };

        Self::new(&settings.api_base, &api_key, &settings.model, timeout)
    }

    pub fn new(api_base: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: chat_endpoint(api_base)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request for a single-message completion without sending it.
    pub fn build_request(&self, prompt: &str) -> Result<reqwest::Request> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
        };

        Ok(self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .build()?)
    }

    /// Send `prompt` as a user message and return the assistant's reply.
    ///
    /// The exchange is logged on the HTTP traffic target.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn complete(&self, prompt: &str) -> Result<ChatMessage> {
        let request = self.build_request(prompt)?;
        let captured_request = CapturedRequest::from(&request);

        debug!("Sending chat completion request");
        let response = self.http.execute(request).await?;
        let captured = CapturedResponse::capture(response, Some(captured_request)).await?;

        log_exchange(Level::INFO, "chat completion", None, Some(&captured));

        parse_completion(&captured)
    }
}

/// Resolve the chat completions URL under an API base.
pub fn chat_endpoint(api_base: &str) -> Result<Url> {
    let base = if api_base.ends_with('/') {
        Url::parse(api_base)?
    } else {
        Url::parse(&format!("{}/", api_base))?
    };
    Ok(base.join("chat/completions")?)
}

/// Extract the first choice from a captured completion response.
pub fn parse_completion(response: &CapturedResponse) -> Result<ChatMessage> {
    let body = response.text.as_bytes();

    if !response.is_success() {
        let detail = serde_json::from_slice::<ApiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
        return Err(HeimdallError::Completion(format!(
            "{} {}: {}",
            response.status, response.reason, detail
        )));
    }

    let parsed: ChatResponse = serde_json::from_slice(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| HeimdallError::Completion("Response contained no choices".to_string()))
}
