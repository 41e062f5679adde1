//! Recovers [`StreamChunk`]s from a byte stream that may split mid-frame.

use sensei_core::StreamChunk;

/// Stateful decoder for the `data: <json>\n\n` framing.
///
/// Network chunks can split a logical frame anywhere, including inside a
/// multi-byte UTF-8 sequence, so the tail is buffered as raw bytes and only
/// complete lines are parsed. One decoder instance serves one logical
/// response; it remembers whether a terminal chunk has been seen so the
/// `[DONE]` sentinel can synthesize an implicit `complete` when the producer
/// never sent one.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: Vec<u8>,
    terminal_seen: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes and returns every fully-framed chunk found so far.
    ///
    /// A line that fails JSON parsing is logged and dropped; it never aborts
    /// decoding of subsequent valid frames.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.buffer.extend_from_slice(bytes);

        let mut chunks = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            let Some(data) = line.strip_prefix("data:") else {
                // Non-data SSE lines (comments, event names) carry nothing here.
                continue;
            };
            let data = data.trim_start();

            if data == "[DONE]" {
                if !self.terminal_seen {
                    self.terminal_seen = true;
                    chunks.push(StreamChunk::complete(None, None));
                }
                continue;
            }

            match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => {
                    if chunk.is_terminal() {
                        self.terminal_seen = true;
                    }
                    chunks.push(chunk);
                }
                Err(err) => {
                    tracing::warn!(error = %err, frame = %data, "dropping malformed stream frame");
                }
            }
        }

        chunks
    }

    /// Whether a terminal `complete`/`error` chunk has been decoded.
    pub fn terminal_seen(&self) -> bool {
        self.terminal_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::StreamEncoder;
    use sensei_core::TokenUsage;

    fn encode_all(chunks: &[StreamChunk]) -> String {
        let encoder = StreamEncoder::new();
        chunks
            .iter()
            .map(|c| encoder.encode(c).unwrap())
            .collect::<String>()
    }

    fn sample_sequence() -> Vec<StreamChunk> {
        vec![
            StreamChunk::metadata("msg-1", "2026-08-07T12:00:00Z", None),
            StreamChunk::typing_start(),
            StreamChunk::content("Hello, "),
            StreamChunk::content("wörld ☕"),
            StreamChunk::typing_stop(),
            StreamChunk::complete(Some(TokenUsage::new(12, 7)), None),
        ]
    }

    #[test]
    fn test_round_trip_single_feed() {
        let chunks = sample_sequence();
        let wire = encode_all(&chunks);

        let mut decoder = StreamDecoder::new();
        let decoded = decoder.feed(wire.as_bytes());
        assert_eq!(decoded, chunks);
    }

    #[test]
    fn test_round_trip_byte_at_a_time() {
        let chunks = sample_sequence();
        let wire = encode_all(&chunks);

        let mut decoder = StreamDecoder::new();
        let mut decoded = Vec::new();
        for byte in wire.as_bytes() {
            decoded.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(decoded, chunks);
    }

    #[test]
    fn test_round_trip_arbitrary_splits() {
        let chunks = sample_sequence();
        let wire = encode_all(&chunks);
        let bytes = wire.as_bytes();

        for split in [1usize, 7, 13, 50, 101] {
            let split = split.min(bytes.len());
            let mut decoder = StreamDecoder::new();
            let mut decoded = decoder.feed(&bytes[..split]);
            decoded.extend(decoder.feed(&bytes[split..]));
            assert_eq!(decoded, chunks, "split at byte {split}");
        }
    }

    #[test]
    fn test_malformed_frame_is_isolated() {
        let encoder = StreamEncoder::new();
        let first = encoder.encode(&StreamChunk::content("a")).unwrap();
        let second = encoder.encode(&StreamChunk::content("b")).unwrap();
        let wire = format!("{first}data: {{not json}}\n\n{second}");

        let mut decoder = StreamDecoder::new();
        let decoded = decoder.feed(wire.as_bytes());
        assert_eq!(
            decoded,
            vec![StreamChunk::content("a"), StreamChunk::content("b")]
        );
    }

    #[test]
    fn test_done_synthesizes_implicit_complete() {
        let encoder = StreamEncoder::new();
        let wire = format!(
            "{}{}",
            encoder.encode(&StreamChunk::content("a")).unwrap(),
            encoder.done()
        );

        let mut decoder = StreamDecoder::new();
        let decoded = decoder.feed(wire.as_bytes());
        assert_eq!(
            decoded,
            vec![
                StreamChunk::content("a"),
                StreamChunk::complete(None, None)
            ]
        );
        assert!(decoder.terminal_seen());
    }

    #[test]
    fn test_done_after_complete_adds_nothing() {
        let chunks = vec![
            StreamChunk::content("a"),
            StreamChunk::complete(Some(TokenUsage::new(3, 2)), None),
        ];
        let wire = format!("{}{}", encode_all(&chunks), StreamEncoder::new().done());

        let mut decoder = StreamDecoder::new();
        let decoded = decoder.feed(wire.as_bytes());
        assert_eq!(decoded, chunks);
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let mut decoder = StreamDecoder::new();
        let decoded = decoder.feed(b": keep-alive comment\nevent: ping\n\n");
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_partial_tail_is_retained() {
        let encoder = StreamEncoder::new();
        let frame = encoder.encode(&StreamChunk::content("tail")).unwrap();
        let (head, tail) = frame.as_bytes().split_at(frame.len() - 4);

        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(head).is_empty());
        assert_eq!(decoder.feed(tail), vec![StreamChunk::content("tail")]);
    }
}
