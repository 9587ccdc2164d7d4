//! Nullable transport: an in-memory byte stream.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

/// Records written bytes and replays queued replies.
#[derive(Clone, Default)]
pub struct NullTransport {
    written: Arc<Mutex<Vec<u8>>>,
    replies: Arc<Mutex<Vec<u8>>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the next reads.
    pub fn enqueue(&self, bytes: &[u8]) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.extend_from_slice(bytes);
        }
    }

    /// Everything written so far (for assertions).
    pub fn written(&self) -> Vec<u8> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl Read for NullTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut replies = self
            .replies
            .lock()
            .map_err(|_| io::Error::other("transport lock poisoned"))?;
        let n = buf.len().min(replies.len());
        buf[..n].copy_from_slice(&replies[..n]);
        replies.drain(..n);
        Ok(n)
    }
}

impl Write for NullTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written
            .lock()
            .map_err(|_| io::Error::other("transport lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
