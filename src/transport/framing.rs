//! Newline framing for the streamed response body
//!
//! The body is UTF-8 text, one JSON event per line. Network chunks split
//! lines, and sometimes characters, at arbitrary byte offsets. [`FrameDecoder`]
//! reassembles them:
//!
//! ```text
//! chunk bytes ─► pending (incomplete UTF-8 tail) ─► buffer (no '\n') ─► lines
//! ```
//!
//! Trailing fragment policy: when the stream ends, [`FrameDecoder::finish`]
//! returns a non-empty unterminated fragment so the caller can attempt to
//! parse it. A fragment that does not parse is dropped like any other
//! malformed line.

use crate::types::options::DEFAULT_MAX_LINE_BYTES;

/// Replacement for invalid UTF-8 sequences
const REPLACEMENT: char = '\u{FFFD}';

/// Incremental line decoder for one response stream
#[derive(Debug)]
pub struct FrameDecoder {
    /// Text received but not yet terminated by a newline
    buffer: String,
    /// Bytes of a multi-byte character whose remainder has not arrived
    pending: Vec<u8>,
    /// Lines longer than this are discarded
    max_line_bytes: usize,
    /// Dropping input until the next newline after an overflow
    discarding: bool,
    /// Number of lines discarded for exceeding `max_line_bytes`
    overflowed_lines: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with the default 1MB line limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_line_bytes(DEFAULT_MAX_LINE_BYTES)
    }

    /// Create a decoder with a custom line limit
    #[must_use]
    pub fn with_max_line_bytes(max_line_bytes: usize) -> Self {
        Self {
            buffer: String::new(),
            pending: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            discarding: false,
            overflowed_lines: 0,
        }
    }

    /// Feed one chunk and collect every line it completes
    ///
    /// Lines are returned in arrival order without their terminator
    /// (`\n`, or `\r\n`). Empty lines are returned too; callers skip them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decode(chunk);
        let mut lines = Vec::new();
        let mut rest = text.as_str();

        while let Some(pos) = rest.find('\n') {
            let (head, tail) = rest.split_at(pos);
            rest = &tail[1..];

            if self.discarding {
                // Tail end of an overflowed line
                self.discarding = false;
                self.buffer.clear();
                continue;
            }

            self.buffer.push_str(head);
            if self.buffer.len() > self.max_line_bytes {
                self.record_overflow();
                self.buffer.clear();
                continue;
            }

            let mut line = std::mem::take(&mut self.buffer);
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }

        if !self.discarding {
            self.buffer.push_str(rest);
            if self.buffer.len() > self.max_line_bytes {
                self.record_overflow();
                self.buffer.clear();
                self.discarding = true;
            }
        }

        lines
    }

    /// Signal end of stream and take the unterminated trailing fragment
    ///
    /// Returns `None` when nothing but whitespace remains. The decoder is
    /// empty afterwards.
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            if !self.discarding {
                self.buffer.push_str(&String::from_utf8_lossy(&tail));
            }
        }
        self.discarding = false;

        let fragment = std::mem::take(&mut self.buffer);
        let trimmed = fragment.trim();
        if trimmed.is_empty() {
            None
        } else {
            log::debug!("Stream ended with unterminated fragment ({} bytes)", trimmed.len());
            Some(trimmed.to_string())
        }
    }

    /// Bytes currently held back awaiting a newline
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending.len()
    }

    /// Number of lines discarded for exceeding the length limit
    #[must_use]
    pub const fn overflowed_lines(&self) -> usize {
        self.overflowed_lines
    }

    /// Stateful UTF-8 decode: complete characters out, incomplete tail kept
    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = input.split_at(e.valid_up_to());
                    // `valid_up_to` marks a char boundary, so this cannot fail
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            input = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn record_overflow(&mut self) {
        self.overflowed_lines += 1;
        log::warn!(
            "Discarding stream line longer than {} bytes",
            self.max_line_bytes
        );
    }
}
