//! Chat-completion client for the analysis LLM.
//!
//! Speaks the OpenAI-compatible `/chat/completions` shape (one user message,
//! max tokens, temperature) so the endpoint is swappable by base URL. Errors
//! are a typed [`LlmError`]; the legacy in-band `LLM_ERROR:` sentinel the
//! parser still recognizes does not originate here.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the chat-completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("LLM API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response with no usable message content.
    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct LlmClient {
    client: Client,
    completions_url: Url,
    api_key: String,
}

impl LlmClient {
    /// Creates a client for `base_url` (e.g. the Gemini OpenAI-compat root).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`LlmError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let completions_url = Url::parse(&format!(
            "{}/chat/completions",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| LlmError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            completions_url,
            api_key: api_key.to_owned(),
        })
    }

    /// Sends one prompt as a single user message and returns the first
    /// choice's content, trimmed and with any markdown code fence stripped.
    ///
    /// One request, one response. No streaming, no retries.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Api`] if the endpoint returns a non-2xx status.
    /// - [`LlmError::Http`] on transport failure or an unparseable body.
    /// - [`LlmError::EmptyResponse`] if the response carries no content.
    pub async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(model, status = status.as_u16(), "LLM call failed");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::info!(model, response_chars = content.len(), "LLM call succeeded");
        Ok(strip_code_fence(&content).to_owned())
    }
}

/// Removes a wrapping ```json / ``` markdown fence, if present, and trims
/// surrounding whitespace. Unfenced text passes through unchanged.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    for prefix in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            // A lone opening fence without a closing one still gets stripped.
            return rest.strip_suffix("```").unwrap_or(rest).trim();
        }
    }
    trimmed
}
