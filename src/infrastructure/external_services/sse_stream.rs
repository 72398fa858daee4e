use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::borrow::Cow;
use std::collections::VecDeque;

use crate::application::ports::chat_provider::ChatProviderError;

/// Turns arbitrarily split byte chunks into complete SSE blocks.
/// Bytes are buffered undecoded so a character split across chunks survives.
#[derive(Debug, Default)]
pub struct SseChunkProcessor {
    pending: Vec<u8>,
}

impl SseChunkProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        // CR never occurs inside a multibyte UTF-8 sequence
        self.pending
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));
    }

    pub fn next_block(&mut self) -> Option<String> {
        loop {
            let pos = self.pending.windows(2).position(|pair| pair == b"\n\n")?;
            let block: Vec<u8> = self.pending.drain(..pos + 2).collect();
            let block = String::from_utf8_lossy(&block);
            let block = block.trim_end_matches('\n');
            if !block.trim().is_empty() {
                return Some(block.to_string());
            }
        }
    }

    pub fn take_remaining(&mut self) -> String {
        let rest = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&rest).into_owned()
    }
}

/// Joins the `data:` lines of one block. `None` for comment-only or empty blocks.
pub fn parse_sse_data(block: &str) -> Option<Cow<'_, str>> {
    let data_lines: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect();

    match data_lines.as_slice() {
        [] => None,
        [single] => Some(Cow::Borrowed(single)),
        many => Some(Cow::Owned(many.join("\n"))),
    }
}

struct SseState<E> {
    upstream: BoxStream<'static, Result<Bytes, E>>,
    processor: SseChunkProcessor,
    ready: VecDeque<String>,
    finished: bool,
}

impl<E> SseState<E> {
    fn collect_blocks(&mut self) {
        while let Some(block) = self.processor.next_block() {
            if let Some(data) = parse_sse_data(&block) {
                self.ready.push_back(data.into_owned());
            }
        }
    }
}

/// Yields the `data:` payload of every SSE event in an upstream byte stream.
/// A transport error is yielded once and ends the stream.
pub fn sse_data_stream<S, E>(upstream: S) -> BoxStream<'static, Result<String, ChatProviderError>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = SseState {
        upstream: upstream.boxed(),
        processor: SseChunkProcessor::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(data) = state.ready.pop_front() {
                return Some((Ok(data), state));
            }
            if state.finished {
                return None;
            }

            match state.upstream.next().await {
                Some(Ok(chunk)) => {
                    state.processor.push_chunk(&chunk);
                    state.collect_blocks();
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(ChatProviderError::StreamError(e.to_string())), state));
                }
                None => {
                    state.finished = true;
                    let rest = state.processor.take_remaining();
                    if let Some(data) = parse_sse_data(&rest) {
                        state.ready.push_back(data.into_owned());
                    }
                }
            }
        }
    })
    .boxed()
}
