//! Output streams
//!
//! Tagged output chunks, the sinks that receive them, and the stateful
//! UTF-8 decoder that turns raw pipe reads into text without splitting
//! multi-byte characters across chunk boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Origin of an output chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamType {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::Stdout => write!(f, "stdout"),
            StreamType::Stderr => write!(f, "stderr"),
        }
    }
}

/// A decoded piece of output, delivered as soon as it is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    /// Stream the text was read from
    pub stream: StreamType,
    /// Decoded text
    pub text: String,
    /// Timestamp when received
    pub timestamp: DateTime<Utc>,
}

impl OutputChunk {
    /// Create a chunk stamped with the current time
    pub fn new(stream: StreamType, text: impl Into<String>) -> Self {
        Self {
            stream,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Receiver of streamed output chunks
///
/// Within one stream, chunks arrive in the order the bytes were produced.
/// Stdout and stderr are drained concurrently, so there is no ordering
/// between them.
pub trait ChunkSink: Send + Sync {
    /// Deliver one chunk
    fn send_chunk(&self, chunk: OutputChunk);
}

impl ChunkSink for UnboundedSender<OutputChunk> {
    fn send_chunk(&self, chunk: OutputChunk) {
        // A dropped receiver only means nobody is watching any more
        let _ = self.send(chunk);
    }
}

impl<F> ChunkSink for F
where
    F: Fn(OutputChunk) + Send + Sync,
{
    fn send_chunk(&self, chunk: OutputChunk) {
        self(chunk)
    }
}

/// Sink that discards every chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ChunkSink for NullSink {
    fn send_chunk(&self, _chunk: OutputChunk) {}
}

/// Incremental UTF-8 decoder
///
/// Holds back an incomplete trailing sequence until the next read completes
/// it. Invalid bytes become U+FFFD exactly as `String::from_utf8_lossy`
/// would replace them in the concatenated input.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
}

impl StreamDecoder {
    /// Create a decoder with no pending bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next bytes, returning all text that is complete so far
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut text = String::with_capacity(input.len());
        let mut rest = input.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // `valid_up_to` bytes are known to be valid
                    text.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        Some(invalid_len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            // Sequence may be completed by the next read
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        text
    }

    /// Flush a trailing partial sequence once the stream has ended
    pub fn finish(&mut self) -> String {
        let pending = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&pending).into_owned()
    }

    /// Whether bytes are being held back
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
