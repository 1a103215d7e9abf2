//! Streaming chat response.
//!
//! [`ChatStream`] yields response text fragments as the provider produces
//! them. The turn is written to memory only when the provider signals the end
//! of the response; an error or an early drop leaves memory untouched.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::Stream;
use futures_util::stream::FusedStream;
use tracing::debug;

use persona_types::llm::{LlmError, StreamEvent, Usage};

use crate::llm::provider::EventStream;

use super::memory::ConversationMemory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Streaming,
    Committed,
    Failed,
}

/// A single-use stream of response fragments for one turn.
///
/// Borrows the agent's memory mutably for its whole lifetime, so no other
/// turn can start until this one is drained or dropped.
pub struct ChatStream<'a> {
    inner: EventStream,
    memory: &'a mut ConversationMemory,
    query: String,
    response: String,
    usage: Option<Usage>,
    state: State,
    span: tracing::Span,
}

impl<'a> ChatStream<'a> {
    pub(crate) fn new(
        inner: EventStream,
        memory: &'a mut ConversationMemory,
        query: String,
        span: tracing::Span,
    ) -> Self {
        Self {
            inner,
            memory,
            query,
            response: String::new(),
            usage: None,
            state: State::Streaming,
            span,
        }
    }

    /// Whether the turn has been recorded in memory.
    pub fn is_committed(&self) -> bool {
        self.state == State::Committed
    }

    /// Token usage, if the provider reported it.
    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    fn commit(&mut self) {
        debug!(
            response_len = self.response.len(),
            "Streaming turn complete, recording in memory"
        );
        self.memory
            .append(std::mem::take(&mut self.query), self.response.clone());
        self.state = State::Committed;
    }
}

impl Stream for ChatStream<'_> {
    type Item = Result<String, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Every field is Unpin: the provider stream is already boxed and pinned.
        let this = self.get_mut();
        if this.state != State::Streaming {
            return Poll::Ready(None);
        }

        let span = this.span.clone();
        let _enter = span.enter();

        loop {
            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(StreamEvent::TextDelta { text })) => {
                    if text.is_empty() {
                        continue;
                    }
                    this.response.push_str(&text);
                    return Poll::Ready(Some(Ok(text)));
                }
                Some(Ok(StreamEvent::Usage(usage))) => {
                    this.usage = Some(usage);
                }
                Some(Ok(StreamEvent::Done)) | None => {
                    this.commit();
                    return Poll::Ready(None);
                }
                Some(Ok(StreamEvent::Connected | StreamEvent::MessageDelta { .. })) => {}
                Some(Err(err)) => {
                    this.state = State::Failed;
                    return Poll::Ready(Some(Err(err)));
                }
            }
        }
    }
}

impl FusedStream for ChatStream<'_> {
    fn is_terminated(&self) -> bool {
        self.state != State::Streaming
    }
}
