//! Bridges a model response onto the wire protocol.
//!
//! This is the server-side spine: a [`ChatResponse`] is consumed once and
//! re-emitted as encoded SSE frames for the HTTP layer to write through.

use crate::response::ChatResponse;
use sensei_core::{CoachingContext, Result, StreamChunk};
use sensei_stream::StreamEncoder;
use tokio::sync::mpsc;

/// Streams one response as encoded frames into `frames`.
///
/// Frame order: `metadata`, `typing start`, one `content` chunk per
/// fragment, `typing stop`, then exactly one terminal chunk (`complete`
/// with usage and the opaque `limitStatus` passthrough, or `error` derived
/// from the failure), and finally the `[DONE]` sentinel.
///
/// A closed `frames` receiver means the client went away: the response is
/// cancelled and the relay returns without emitting further frames.
pub async fn relay_response(
    mut response: ChatResponse,
    context: Option<CoachingContext>,
    limit_status: Option<serde_json::Value>,
    frames: mpsc::Sender<String>,
) -> Result<()> {
    let encoder = StreamEncoder::new();

    let opening = StreamChunk::metadata(
        response.response_id().to_string(),
        chrono::Utc::now().to_rfc3339(),
        context,
    );
    if !send_chunk(&encoder, &frames, &opening).await?
        || !send_chunk(&encoder, &frames, &StreamChunk::typing_start()).await?
    {
        response.cancel();
        return Ok(());
    }

    let mut failure = None;
    while let Some(fragment) = response.next_fragment().await {
        match fragment {
            Ok(text) => {
                if !send_chunk(&encoder, &frames, &StreamChunk::content(text)).await? {
                    response.cancel();
                    return Ok(());
                }
            }
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    if !send_chunk(&encoder, &frames, &StreamChunk::typing_stop()).await? {
        return Ok(());
    }

    let terminal = match failure {
        None => StreamChunk::complete(response.usage().copied(), limit_status),
        Some(err) => {
            tracing::warn!(
                response_id = %response.response_id(),
                error = %err,
                "response failed; emitting error chunk"
            );
            StreamChunk::from_error(&err)
        }
    };
    if !send_chunk(&encoder, &frames, &terminal).await? {
        return Ok(());
    }

    let _ = frames.send(encoder.done().to_string()).await;
    Ok(())
}

/// Encodes and sends one chunk; `Ok(false)` means the receiver is gone.
async fn send_chunk(
    encoder: &StreamEncoder,
    frames: &mpsc::Sender<String>,
    chunk: &StreamChunk,
) -> Result<bool> {
    let frame = encoder.encode(chunk)?;
    Ok(frames.send(frame).await.is_ok())
}
