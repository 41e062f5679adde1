//! Serializes [`StreamChunk`]s into `text/event-stream` framing.

use sensei_core::{Result, StreamChunk};

/// Transport-level end-of-stream sentinel, distinct from the protocol-level
/// `complete` chunk.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Response headers the HTTP collaborator must set on the streaming reply.
pub const SSE_RESPONSE_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "text/event-stream"),
    ("Cache-Control", "no-cache"),
    ("Connection", "keep-alive"),
];

/// Frames chunks for an HTTP streaming response.
///
/// Each chunk becomes a single JSON line prefixed with `data: ` and
/// terminated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamEncoder;

impl StreamEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes one chunk as a complete SSE frame.
    pub fn encode(&self, chunk: &StreamChunk) -> Result<String> {
        let json = serde_json::to_string(chunk)?;
        Ok(format!("data: {json}\n\n"))
    }

    /// The transport-level end sentinel.
    pub fn done(&self) -> &'static str {
        DONE_FRAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_shape() {
        let encoder = StreamEncoder::new();
        let frame = encoder.encode(&StreamChunk::content("hi")).unwrap();
        assert_eq!(frame, "data: {\"type\":\"content\",\"content\":\"hi\"}\n\n");
    }

    #[test]
    fn test_done_sentinel() {
        assert_eq!(StreamEncoder::new().done(), "data: [DONE]\n\n");
    }
}
