//! Streaming client for the upstream model provider.
//!
//! Issues one streaming request per user message against the Claude
//! messages API, normalizes the provider's event stream into plain text
//! fragments, and resolves a [`TokenUsage`] once the stream finishes.

use crate::config::ClientConfig;
use crate::response::{ChatResponse, ResponseEvent};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use sensei_core::{ChatMessage, ChatRole, CoachingContext, Result, SenseiError, TokenUsage};
use sensei_persona::PersonaEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Bounded fragment channel: the network reader stays at most this many
/// fragments ahead of the consumer.
const FRAGMENT_CHANNEL_CAPACITY: usize = 256;

/// Callback invoked exactly once per response with the final usage totals.
pub type UsageObserver = Arc<dyn Fn(&TokenUsage) + Send + Sync>;

/// Client that talks to the hosted model and re-emits a normalized
/// fragment stream.
#[derive(Clone)]
pub struct CoachClient {
    http: Client,
    config: ClientConfig,
    engine: PersonaEngine,
    usage_observer: Option<UsageObserver>,
}

impl CoachClient {
    /// Creates a client with the default persona engine.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            engine: PersonaEngine::default(),
            usage_observer: None,
        }
    }

    /// Loads configuration from secret.json or environment variables.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::try_from_env()?))
    }

    /// Replaces the persona engine driving system-prompt generation.
    pub fn with_engine(mut self, engine: PersonaEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Registers an observer for final usage totals (e.g. the billing
    /// collaborator). Invoked exactly once per response.
    pub fn with_usage_observer(mut self, observer: UsageObserver) -> Self {
        self.usage_observer = Some(observer);
        self
    }

    pub fn engine(&self) -> &PersonaEngine {
        &self.engine
    }

    /// Issues one streaming chat request.
    ///
    /// The system prompt is rendered from `context` via the persona engine.
    /// Only text deltas are republished from the upstream stream; every
    /// other upstream event type is discarded except the usage carriers.
    pub async fn stream_chat(
        &self,
        message: &str,
        history: &[ChatMessage],
        context: Option<&CoachingContext>,
    ) -> Result<ChatResponse> {
        if message.trim().is_empty() {
            return Err(SenseiError::upstream("message must not be empty", false));
        }

        let system = self.engine.generate_system_prompt(context);

        let mut messages: Vec<WireMessage> = history
            .iter()
            .map(|m| WireMessage {
                role: role_str(m.role),
                content: &m.content,
            })
            .collect();
        messages.push(WireMessage {
            role: "user",
            content: message,
        });

        let request = CreateMessageRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: true,
            system: Some(&system),
            messages,
        };

        let response = self
            .http
            .post(BASE_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| SenseiError::transport(format!("chat request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let (events_tx, events_rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let response_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(response_id = %response_id, model = %self.config.model, "chat stream opened");

        tokio::spawn(pump_stream(
            Box::pin(response.bytes_stream()),
            events_tx,
            cancel.child_token(),
            self.usage_observer.clone(),
        ));

        Ok(ChatResponse::from_channel(response_id, events_rx, cancel))
    }

    /// Connectivity probe. Returns a boolean rather than raising.
    pub async fn test_connection(&self) -> bool {
        let request = CreateMessageRequest {
            model: &self.config.model,
            max_tokens: 1,
            temperature: 0.0,
            stream: false,
            system: None,
            messages: vec![WireMessage {
                role: "user",
                content: "ping",
            }],
        };

        match self
            .http
            .post(BASE_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "connectivity probe failed");
                false
            }
        }
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

/// Reads the provider's SSE body, forwarding text deltas and accumulating
/// usage totals until the message stops or the consumer goes away.
async fn pump_stream<S>(
    mut body: S,
    events: mpsc::Sender<ResponseEvent>,
    cancel: CancellationToken,
    observer: Option<UsageObserver>,
) where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin,
{
    let mut buffer: Vec<u8> = Vec::new();
    let mut input_tokens = 0u32;
    let mut output_tokens = 0u32;

    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("response cancelled; stopping fragment production");
                return;
            }
            chunk = body.next() => chunk,
        };
        let Some(chunk) = chunk else { break };
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(err) => {
                let _ = events.send(ResponseEvent::Failed(SenseiError::from(err))).await;
                return;
            }
        };

        buffer.extend_from_slice(&bytes);
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line_str = String::from_utf8_lossy(&line);
            let line = line_str.trim();
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };

            match parse_upstream_event(data.trim_start()) {
                Some(UpstreamEvent::MessageStart { message }) => {
                    input_tokens = message.usage.input_tokens;
                }
                Some(UpstreamEvent::ContentBlockDelta { delta }) => {
                    if let Some(text) = delta.text {
                        if !text.is_empty()
                            && events.send(ResponseEvent::Fragment(text)).await.is_err()
                        {
                            return;
                        }
                    }
                }
                Some(UpstreamEvent::MessageDelta { usage }) => {
                    output_tokens = usage.output_tokens;
                }
                Some(UpstreamEvent::MessageStop) => {
                    finish(&events, &observer, input_tokens, output_tokens).await;
                    return;
                }
                Some(UpstreamEvent::Error { error }) => {
                    let retryable = matches!(
                        error.kind.as_str(),
                        "overloaded_error" | "api_error" | "rate_limit_error"
                    );
                    let _ = events
                        .send(ResponseEvent::Failed(SenseiError::upstream(
                            error.message,
                            retryable,
                        )))
                        .await;
                    return;
                }
                Some(UpstreamEvent::Other) | None => {}
            }
        }
    }

    // Stream ended without message_stop: resolve what we have so the
    // response still terminates cleanly.
    finish(&events, &observer, input_tokens, output_tokens).await;
}

async fn finish(
    events: &mpsc::Sender<ResponseEvent>,
    observer: &Option<UsageObserver>,
    input_tokens: u32,
    output_tokens: u32,
) {
    let usage = TokenUsage::new(input_tokens, output_tokens);
    if let Some(observer) = observer {
        observer(&usage);
    }
    let _ = events.send(ResponseEvent::Completed(usage)).await;
}

fn parse_upstream_event(data: &str) -> Option<UpstreamEvent> {
    match serde_json::from_str::<UpstreamEvent>(data) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::debug!(error = %err, "skipping unrecognized upstream frame");
            None
        }
    }
}

fn map_http_error(status: StatusCode, body: String) -> SenseiError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SenseiError::authorization(status.as_u16(), message)
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => SenseiError::upstream(message, true),
        _ => SenseiError::upstream(message, false),
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum UpstreamEvent {
    MessageStart { message: UpstreamMessage },
    ContentBlockDelta { delta: UpstreamDelta },
    MessageDelta { usage: UpstreamOutputUsage },
    MessageStop,
    Error { error: UpstreamErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct UpstreamMessage {
    usage: UpstreamInputUsage,
}

#[derive(Deserialize)]
struct UpstreamInputUsage {
    input_tokens: u32,
}

#[derive(Deserialize)]
struct UpstreamOutputUsage {
    output_tokens: u32,
}

#[derive(Deserialize)]
struct UpstreamDelta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
