//! End-to-end pipeline tests: fragment source → relay → SSE wire → decoder.

use sensei_core::{
    CoachingContext, Pathway, Phase, SenseiError, SessionDescriptor, StreamChunk, TokenUsage,
};
use sensei_interaction::relay_response;
use sensei_interaction::response::{ChatResponse, ResponseEvent};
use sensei_stream::StreamDecoder;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn channel_response(events: Vec<ResponseEvent>) -> ChatResponse {
    let (tx, rx) = mpsc::channel(32);
    for event in events {
        tx.try_send(event).unwrap();
    }
    drop(tx);
    ChatResponse::from_channel("resp-e2e", rx, CancellationToken::new())
}

async fn collect_wire(response: ChatResponse, context: Option<CoachingContext>) -> String {
    let (frames_tx, mut frames_rx) = mpsc::channel(64);
    relay_response(response, context, None, frames_tx)
        .await
        .unwrap();

    let mut wire = String::new();
    while let Some(frame) = frames_rx.recv().await {
        wire.push_str(&frame);
    }
    wire
}

/// Decodes the wire after splitting it at fixed byte positions, simulating
/// network chunking.
fn decode_with_splits(wire: &str, splits: &[usize]) -> Vec<StreamChunk> {
    let bytes = wire.as_bytes();
    let mut decoder = StreamDecoder::new();
    let mut chunks = Vec::new();
    let mut last = 0;
    for &split in splits {
        let split = split.min(bytes.len());
        chunks.extend(decoder.feed(&bytes[last..split]));
        last = split;
    }
    chunks.extend(decoder.feed(&bytes[last..]));
    chunks
}

#[tokio::test]
async fn test_round_trip_with_artificial_chunking() {
    let response = channel_response(vec![
        ResponseEvent::Fragment("Here are ".into()),
        ResponseEvent::Fragment("two pricing models ".into()),
        ResponseEvent::Fragment("worth comparing.".into()),
        ResponseEvent::Completed(TokenUsage::new(120, 85)),
    ]);

    let context = CoachingContext {
        session: Some(SessionDescriptor::new(
            Pathway::Entrepreneurship,
            Phase::Analysis,
            30,
        )),
        ..Default::default()
    };

    let wire = collect_wire(response, Some(context.clone())).await;
    let chunks = decode_with_splits(&wire, &[1, 7, 50]);

    match chunks.first() {
        Some(StreamChunk::Metadata { metadata }) => {
            assert_eq!(metadata.message_id, "resp-e2e");
            assert_eq!(metadata.context.as_ref(), Some(&context));
        }
        other => panic!("expected metadata chunk first, got {other:?}"),
    }

    let contents: Vec<&str> = chunks
        .iter()
        .filter_map(|chunk| match chunk {
            StreamChunk::Content { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert!(!contents.is_empty());
    assert_eq!(
        contents.concat(),
        "Here are two pricing models worth comparing."
    );

    let terminals: Vec<&StreamChunk> = chunks.iter().filter(|c| c.is_terminal()).collect();
    assert_eq!(terminals.len(), 1, "exactly one terminal chunk per response");
    match terminals[0] {
        StreamChunk::Complete {
            usage: Some(usage), ..
        } => {
            assert_eq!(usage.total_tokens, usage.input_tokens + usage.output_tokens);
            assert_eq!(usage.total_tokens, 205);
        }
        other => panic!("expected complete chunk with usage, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_stream_terminates_with_error_chunk() {
    let response = channel_response(vec![
        ResponseEvent::Fragment("partial ".into()),
        ResponseEvent::Failed(SenseiError::upstream("model overloaded", true)),
    ]);

    let wire = collect_wire(response, None).await;
    let chunks = decode_with_splits(&wire, &[3, 19]);

    let terminals: Vec<&StreamChunk> = chunks.iter().filter(|c| c.is_terminal()).collect();
    assert_eq!(terminals.len(), 1);
    match terminals[0] {
        StreamChunk::Error {
            error,
            error_details: Some(details),
        } => {
            assert!(error.contains("model overloaded"));
            assert!(details.retryable);
        }
        other => panic!("expected error chunk, got {other:?}"),
    }

    // The [DONE] sentinel must not synthesize a second terminal chunk.
    assert!(wire.ends_with("data: [DONE]\n\n"));
}

#[tokio::test]
async fn test_fragment_order_is_preserved_byte_at_a_time() {
    let fragments = ["alpha ", "beta ", "gamma"];
    let response = channel_response(
        fragments
            .iter()
            .map(|f| ResponseEvent::Fragment(f.to_string()))
            .chain(std::iter::once(ResponseEvent::Completed(TokenUsage::new(
                10, 3,
            ))))
            .collect(),
    );

    let wire = collect_wire(response, None).await;

    let mut decoder = StreamDecoder::new();
    let mut chunks = Vec::new();
    for byte in wire.as_bytes() {
        chunks.extend(decoder.feed(std::slice::from_ref(byte)));
    }

    let contents: Vec<&str> = chunks
        .iter()
        .filter_map(|chunk| match chunk {
            StreamChunk::Content { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, fragments);
}
