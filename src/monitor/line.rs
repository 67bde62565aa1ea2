use std::borrow::Cow;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const DEFAULT_CAPACITY: usize = 37;
pub const MIN_CAPACITY: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationLine {
    pub bytes: Vec<u8>,
    /// The line did not fit and continues in the next read.
    pub partial: bool,
}

impl NotificationLine {
    pub fn complete(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into(), partial: false }
    }

    pub fn partial(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into(), partial: true }
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Reads lines of at most `capacity` bytes.
///
/// Longer lines come back in `capacity`-sized pieces, each but the last
/// flagged partial. A read error after some bytes of a line hands those
/// bytes out first and reports the error on the following call.
pub struct LineReader<R> {
    inner: R,
    capacity: usize,
    pending_error: Option<io::Error>,
    held_cr: bool,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(MIN_CAPACITY),
            pending_error: None,
            held_cr: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `Ok(None)` at end of stream.
    pub async fn next_line(&mut self) -> io::Result<Option<NotificationLine>> {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }

        let mut line = Vec::with_capacity(self.capacity);
        if self.held_cr {
            self.held_cr = false;
            line.push(b'\r');
        }

        loop {
            let (used, newline) = {
                let available = match self.inner.fill_buf().await {
                    Ok(available) => available,
                    Err(e) if line.is_empty() => return Err(e),
                    Err(e) => {
                        self.pending_error = Some(e);
                        return Ok(Some(NotificationLine::complete(line)));
                    }
                };
                if available.is_empty() {
                    if line.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(NotificationLine::complete(line)));
                }

                let room = self.capacity - line.len();
                let window = &available[..available.len().min(room)];
                match window.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        line.extend_from_slice(&window[..i]);
                        (i + 1, true)
                    }
                    None => {
                        line.extend_from_slice(window);
                        (window.len(), false)
                    }
                }
            };
            self.inner.consume(used);

            if newline {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(NotificationLine::complete(line)));
            }
            if line.len() == self.capacity {
                // A `\r` at the edge may start a `\r\n`; keep it for the next call.
                if line.last() == Some(&b'\r') {
                    line.pop();
                    self.held_cr = true;
                }
                return Ok(Some(NotificationLine::partial(line)));
            }
        }
    }
}
