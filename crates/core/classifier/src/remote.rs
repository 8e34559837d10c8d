use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One message of a chat completion request
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Failure talking to the remote classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request took too long
    Timeout,
    /// Too many requests
    RateLimited,
    /// The service returned a server-side error
    Api { status: u16 },
    /// Credentials were rejected
    Authentication,
    /// The service refused the request as malformed
    InvalidRequest { status: u16 },
    /// The service could not be reached at all
    Connection,
    /// The response body could not be read
    Malformed,
}

impl TransportError {
    /// Whether trying again might help
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout | TransportError::RateLimited | TransportError::Api { .. }
        )
    }

    fn from_status(status: StatusCode) -> TransportError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => TransportError::Timeout,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Authentication,
            status if status.is_server_error() => TransportError::Api {
                status: status.as_u16(),
            },
            status => TransportError::InvalidRequest {
                status: status.as_u16(),
            },
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::from_status(status)
        } else if err.is_decode() {
            TransportError::Malformed
        } else {
            TransportError::Connection
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => f.write_str("request timed out"),
            TransportError::RateLimited => f.write_str("rate limited"),
            TransportError::Api { status } => write!(f, "service error {status}"),
            TransportError::Authentication => f.write_str("authentication failed"),
            TransportError::InvalidRequest { status } => write!(f, "invalid request {status}"),
            TransportError::Connection => f.write_str("could not connect"),
            TransportError::Malformed => f.write_str("malformed response"),
        }
    }
}

#[async_trait]
pub trait CompletionBackend: Sync + Send {
    /// Send a conversation and return the text of the first choice
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TransportError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions endpoint
pub struct ChatCompletions {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl ChatCompletions {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> ChatCompletions {
        let client = Client::builder()
            .user_agent("Warden/0.1 (moderation assistant)")
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        ChatCompletions {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: api_key.trim().to_string(),
            client,
        }
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletions {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                temperature: 0.0,
                max_tokens: 16,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::from_status(status));
        }

        let body: ChatResponse = response.json().await?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
