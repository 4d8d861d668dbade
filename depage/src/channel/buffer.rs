//! Append-only accumulation of command output.
//!
//! Output stays raw bytes while the call is in flight; decoding happens
//! once at the end, lossily, so invalid UTF-8 from a device can never
//! fail a call.

use bytes::BytesMut;
use regex::bytes::Regex;

/// Buffer accumulating everything a command writes to the session.
///
/// Prompt detection searches the whole buffer rather than the latest
/// chunk, since a prompt can arrive split across reads.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: BytesMut,
}

impl OutputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
        }
    }

    /// Append a chunk verbatim.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Whether the accumulated output matches `pattern` anywhere.
    pub fn contains(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.buf)
    }

    /// Decoded view of the accumulated output. Invalid byte sequences are
    /// replaced, never fatal.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Consume the buffer and decode it.
    pub fn into_text(self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Raw accumulated bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Current buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
