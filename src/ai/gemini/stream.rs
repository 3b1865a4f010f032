//! Incremental decoding of `streamGenerateContent?alt=sse` responses into text
//! chunks.

use super::types::GenerateContentResponse;
use crate::{Error, Result};
use futures::stream::{BoxStream, StreamExt};
use std::collections::VecDeque;

/// Lazy sequence of text chunks from a streaming call.
pub type ReplyStream = BoxStream<'static, Result<String>>;

/// Splits a byte stream into server-sent events and returns their `data` payloads.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed raw bytes; returns the payloads of every event completed by them.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer
            .extend(bytes.iter().copied().filter(|byte| *byte != b'\r'));

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(data) = Self::data_of(&event[..end]) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flush a trailing event that was not terminated by a blank line.
    pub(crate) fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        Self::data_of(&rest)
    }

    fn data_of(event: &[u8]) -> Option<String> {
        let event = String::from_utf8_lossy(event);
        let lines: Vec<&str> = event
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| data.strip_prefix(' ').unwrap_or(data))
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

struct ChunkState {
    bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

/// Turn an open streaming response into text chunks. Events without text (usage
/// trailers, empty deltas) are skipped.
pub(crate) fn text_chunks(response: reqwest::Response) -> ReplyStream {
    let state = ChunkState {
        bytes: response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed(),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        exhausted: false,
    };
    futures::stream::try_unfold(state, next_chunk).boxed()
}

async fn next_chunk(mut state: ChunkState) -> Result<Option<(String, ChunkState)>> {
    loop {
        if let Some(payload) = state.pending.pop_front() {
            if let Some(text) = decode_event(&payload)? {
                return Ok(Some((text, state)));
            }
            continue;
        }

        if state.exhausted {
            return Ok(None);
        }

        match state.bytes.next().await {
            Some(bytes) => {
                let bytes = bytes.map_err(|e| {
                    tracing::error!("Gemini stream interrupted: {}", e);
                    e
                })?;
                let payloads = state.decoder.push(&bytes);
                state.pending.extend(payloads);
            }
            None => {
                let trailing = state.decoder.finish();
                state.pending.extend(trailing);
                state.exhausted = true;
            }
        }
    }
}

fn decode_event(payload: &str) -> Result<Option<String>> {
    let chunk: GenerateContentResponse = serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Failed to parse Gemini stream event: {}\nEvent: {}", e, payload);
        Error::AiProvider(format!("Failed to parse Gemini stream event: {}", e))
    })?;

    if let Some(reason) = chunk.block_reason() {
        tracing::error!("Gemini blocked the streamed prompt: {}", reason);
        return Err(Error::Blocked(reason.to_string()));
    }

    Ok(chunk
        .first_content()
        .and_then(|content| content.text())
        .filter(|text| !text.is_empty()))
}
