//! SSE streaming parser for OpenAI chat completions.
//!
//! Converts a raw `reqwest` byte stream into `ChatCompletionChunk` values.
//! Handles `data: [DONE]`, partial lines, and buffering.

use bytes::Bytes;
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::llm::LlmError;

/// A single chunk from a streaming chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletionChunk {
    /// The text delta for this chunk.
    pub delta: String,
    /// Whether the stream is done.
    pub done: bool,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChunkRaw {
    choices: Vec<StreamChoiceRaw>,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChoiceRaw {
    delta: DeltaRaw,
}

#[derive(Debug, serde::Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

/// Stream adapter that converts raw SSE bytes into `ChatCompletionChunk` values.
pub struct ChatCompletionStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    buffer: Vec<u8>,
    finished: bool,
}

impl ChatCompletionStream {
    pub fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: Vec::new(),
            finished: false,
        }
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<ChatCompletionChunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            if let Some(chunk) = try_parse_line(&mut this.buffer) {
                if matches!(chunk, Ok(ChatCompletionChunk { done: true, .. })) {
                    this.finished = true;
                }
                return Poll::Ready(Some(chunk));
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                // Bytes are buffered raw so a UTF-8 sequence split across reads survives
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(LlmError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    if this.buffer.iter().all(u8::is_ascii_whitespace) {
                        return Poll::Ready(None);
                    }
                    // Final line without a trailing newline
                    this.buffer.push(b'\n');
                    return Poll::Ready(try_parse_line(&mut this.buffer));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Try to extract and parse a complete SSE data line from the buffer.
/// Returns `None` if no complete data line is available yet.
fn try_parse_line(buffer: &mut Vec<u8>) -> Option<Result<ChatCompletionChunk, LlmError>> {
    loop {
        let newline_pos = buffer.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = buffer.drain(..=newline_pos).collect();

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                return Some(Err(LlmError::Parse(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                ))))
            }
        };

        // Blank lines separate events; "event:", "id:" and comments carry nothing we use
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return Some(Ok(ChatCompletionChunk {
                delta: String::new(),
                done: true,
            }));
        }

        return Some(
            serde_json::from_str::<StreamChunkRaw>(data)
                .map(|raw| ChatCompletionChunk {
                    delta: raw
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.delta.content)
                        .unwrap_or_default(),
                    done: false,
                })
                .map_err(|e| {
                    LlmError::Parse(format!(
                        "Failed to parse stream chunk: {} (data: {})",
                        e,
                        data.chars().take(200).collect::<String>()
                    ))
                }),
        );
    }
}
