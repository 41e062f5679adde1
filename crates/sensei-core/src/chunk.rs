//! The wire-level unit of the server-to-browser streaming protocol.
//!
//! A logical response is a sequence of chunks delivered in production order:
//! zero or more `content`/`typing` chunks, then exactly one terminal
//! `complete` or `error` chunk. The transport-level `[DONE]` sentinel is
//! handled by `sensei-stream`, not here.

use crate::context::CoachingContext;
use crate::error::SenseiError;
use crate::usage::TokenUsage;
use serde::{Deserialize, Serialize};

/// Context snapshot attached to the opening `metadata` chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Identifier of the assistant message being streamed.
    pub message_id: String,
    /// RFC 3339 timestamp of when streaming began.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CoachingContext>,
}

/// Advisory typing indicator payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingState {
    Start,
    Stop,
}

/// Structured hint accompanying an `error` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Whether the UI should offer a retry affordance.
    pub retryable: bool,
    /// Actionable text surfaced verbatim for non-retryable failures.
    pub suggestion: String,
}

/// One discrete unit of streamed information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Session/coaching context snapshot sent before any content.
    Metadata { metadata: ChunkMetadata },
    /// A non-empty text delta; concatenate in arrival order.
    Content { content: String },
    /// Advisory typing indicator, non-authoritative for content.
    Typing { content: TypingState },
    /// Normal terminal chunk with optional usage totals and an opaque
    /// rate/limit snapshot injected by an external collaborator.
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<TokenUsage>,
        #[serde(default, rename = "limitStatus")]
        limit_status: Option<serde_json::Value>,
    },
    /// Failure terminal chunk.
    Error {
        error: String,
        #[serde(
            default,
            rename = "errorDetails",
            skip_serializing_if = "Option::is_none"
        )]
        error_details: Option<ErrorDetails>,
    },
}

impl StreamChunk {
    /// Opening metadata chunk for a response.
    pub fn metadata(
        message_id: impl Into<String>,
        timestamp: impl Into<String>,
        context: Option<CoachingContext>,
    ) -> Self {
        Self::Metadata {
            metadata: ChunkMetadata {
                message_id: message_id.into(),
                timestamp: timestamp.into(),
                context,
            },
        }
    }

    /// A text delta chunk.
    pub fn content(content: impl Into<String>) -> Self {
        Self::Content {
            content: content.into(),
        }
    }

    pub fn typing_start() -> Self {
        Self::Typing {
            content: TypingState::Start,
        }
    }

    pub fn typing_stop() -> Self {
        Self::Typing {
            content: TypingState::Stop,
        }
    }

    /// Normal completion.
    pub fn complete(usage: Option<TokenUsage>, limit_status: Option<serde_json::Value>) -> Self {
        Self::Complete {
            usage,
            limit_status,
        }
    }

    /// Failure terminal chunk derived from the error taxonomy.
    pub fn from_error(err: &SenseiError) -> Self {
        let suggestion = match err {
            SenseiError::Config(_) => "Check the server configuration and restart.",
            SenseiError::Transport { .. } => "Check your connection and try again.",
            SenseiError::Cancelled => "The request was cancelled.",
            SenseiError::Authorization { .. } => "Verify the API credentials.",
            SenseiError::Upstream { retryable, .. } => {
                if *retryable {
                    "The model service is temporarily unavailable. Try again shortly."
                } else {
                    "Rephrase your message and try again."
                }
            }
            SenseiError::Serialization { .. } | SenseiError::Internal(_) => {
                "An unexpected error occurred. Contact support if it persists."
            }
        };

        Self::Error {
            error: err.to_string(),
            error_details: Some(ErrorDetails {
                retryable: err.is_retryable(),
                suggestion: suggestion.to_string(),
            }),
        }
    }

    /// Whether this chunk ends the logical response.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_wire_shape() {
        let chunk = StreamChunk::content("partial text");
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json, r#"{"type":"content","content":"partial text"}"#);

        let chunk = StreamChunk::typing_start();
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json, r#"{"type":"typing","content":"start"}"#);
    }

    #[test]
    fn test_complete_wire_shape() {
        let chunk = StreamChunk::complete(Some(TokenUsage::new(10, 5)), None);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains(r#""type":"complete""#));
        assert!(json.contains(r#""limitStatus":null"#));
        assert!(json.contains(r#""total_tokens":15"#));
    }

    #[test]
    fn test_error_chunk_carries_retry_hint() {
        let err = SenseiError::upstream("model overloaded", true);
        let chunk = StreamChunk::from_error(&err);
        match &chunk {
            StreamChunk::Error {
                error,
                error_details: Some(details),
            } => {
                assert!(error.contains("model overloaded"));
                assert!(details.retryable);
            }
            other => panic!("expected error chunk, got {other:?}"),
        }
        assert!(chunk.is_terminal());
    }

    #[test]
    fn test_authorization_error_is_not_retryable_on_wire() {
        let err = SenseiError::authorization(401, "invalid x-api-key");
        match StreamChunk::from_error(&err) {
            StreamChunk::Error {
                error_details: Some(details),
                ..
            } => {
                assert!(!details.retryable);
                assert_eq!(details.suggestion, "Verify the API credentials.");
            }
            other => panic!("expected error chunk, got {other:?}"),
        }
    }

    #[test]
    fn test_terminal_classification() {
        assert!(!StreamChunk::content("x").is_terminal());
        assert!(!StreamChunk::typing_stop().is_terminal());
        assert!(StreamChunk::complete(None, None).is_terminal());
    }
}
