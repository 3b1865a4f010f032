use super::model::GenerativeModel;
use super::stream::ReplyStream;
use super::types::{Content, Part};
use crate::Result;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Multi-turn conversation bound to the model handle it was started with.
///
/// History is append-only: a turn pair (user, model) is recorded only after the
/// service answered successfully.
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: GenerativeModel,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(model: GenerativeModel, history: Vec<Content>) -> Self {
        Self { model, history }
    }

    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Contents for the next request: the recorded history followed by `message`.
    pub(crate) fn contents_with(&self, message: &Content) -> Vec<Content> {
        let mut contents = self.history.clone();
        contents.push(message.clone());
        contents
    }

    pub(crate) fn record(&mut self, message: Content, reply: Content) {
        self.history.push(message);
        self.history.push(reply);
    }

    pub(crate) fn stream_reply(
        &mut self,
        message: Content,
        chunks: ReplyStream,
    ) -> ChatReplyStream<'_> {
        ChatReplyStream {
            inner: chunks,
            session: self,
            message: Some(message),
            collected: String::new(),
        }
    }
}

/// Text chunks of a streamed chat reply.
///
/// When the stream finishes cleanly with some text, the user turn and the
/// concatenated model turn are appended to the session history. An error or an
/// empty reply drops the pending turn.
pub struct ChatReplyStream<'a> {
    inner: ReplyStream,
    session: &'a mut ChatSession,
    message: Option<Content>,
    collected: String,
}

impl Stream for ChatReplyStream<'_> {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.collected.push_str(&chunk);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.message = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                let text = std::mem::take(&mut this.collected);
                match this.message.take() {
                    Some(_) if text.is_empty() => {
                        tracing::warn!("Gemini streamed an empty chat reply; turn not recorded");
                    }
                    Some(message) => {
                        this.session
                            .record(message, Content::model(vec![Part::Text { text }]));
                    }
                    None => {}
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
