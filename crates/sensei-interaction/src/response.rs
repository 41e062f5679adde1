//! The consumer side of one streamed assistant response.
//!
//! A [`ChatResponse`] is a lazy, single-pass, pull-based fragment sequence
//! with an explicit cancellation method and a defined terminal state. Usage
//! totals become available once the stream completes normally.

use futures::Stream;
use sensei_core::{Result, SenseiError, TokenUsage};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lifecycle of one response. The only legal transitions are
/// `Pending → Streaming → {Complete | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Pending,
    Streaming,
    Complete,
    Failed,
}

/// Event produced by a fragment source (the upstream client, or any
/// alternate provider feeding [`ChatResponse::from_channel`]).
#[derive(Debug)]
pub enum ResponseEvent {
    /// One normalized text delta.
    Fragment(String),
    /// Normal end of stream with the final usage totals.
    Completed(TokenUsage),
    /// Terminal failure; nothing follows.
    Failed(SenseiError),
}

/// A streamed assistant response.
#[derive(Debug)]
pub struct ChatResponse {
    response_id: String,
    state: ResponseState,
    usage: Option<TokenUsage>,
    events: mpsc::Receiver<ResponseEvent>,
    cancel: CancellationToken,
}

impl ChatResponse {
    /// Builds a response over any event channel. The producer should watch
    /// `cancel` and stop sending once it fires.
    pub fn from_channel(
        response_id: impl Into<String>,
        events: mpsc::Receiver<ResponseEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            response_id: response_id.into(),
            state: ResponseState::Pending,
            usage: None,
            events,
            cancel,
        }
    }

    pub fn response_id(&self) -> &str {
        &self.response_id
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    /// Final usage totals, available once the stream completed normally.
    pub fn usage(&self) -> Option<&TokenUsage> {
        self.usage.as_ref()
    }

    /// Stops fragment production promptly. No further fragments are
    /// yielded after the in-flight one.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Pulls the next content fragment.
    ///
    /// Returns `None` once the response reached a terminal state. A failure
    /// is yielded exactly once as `Some(Err(_))`; afterwards the state is
    /// `Failed` and the sequence is over.
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        if matches!(self.state, ResponseState::Complete | ResponseState::Failed) {
            return None;
        }

        match self.events.recv().await {
            Some(ResponseEvent::Fragment(text)) => {
                self.state = ResponseState::Streaming;
                Some(Ok(text))
            }
            Some(ResponseEvent::Completed(usage)) => {
                self.state = ResponseState::Complete;
                self.usage = Some(usage);
                None
            }
            Some(ResponseEvent::Failed(err)) => {
                self.state = ResponseState::Failed;
                Some(Err(err))
            }
            // Producer went away without a terminal event (cancelled).
            None => {
                self.state = ResponseState::Complete;
                None
            }
        }
    }

    /// Drains the remaining fragments into the full assistant message.
    pub async fn collect_text(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next_fragment().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for ChatResponse {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if matches!(self.state, ResponseState::Complete | ResponseState::Failed) {
            return Poll::Ready(None);
        }

        match self.events.poll_recv(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(ResponseEvent::Fragment(text))) => {
                self.state = ResponseState::Streaming;
                Poll::Ready(Some(Ok(text)))
            }
            Poll::Ready(Some(ResponseEvent::Completed(usage))) => {
                self.state = ResponseState::Complete;
                self.usage = Some(usage);
                Poll::Ready(None)
            }
            Poll::Ready(Some(ResponseEvent::Failed(err))) => {
                self.state = ResponseState::Failed;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                self.state = ResponseState::Complete;
                Poll::Ready(None)
            }
        }
    }
}
