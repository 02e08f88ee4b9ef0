//! Reassembles stdin reads into whole keys.
//!
//! A read can end mid escape sequence, mid UTF-8 character or mid paste. The buffer holds such
//! tails back and hands out one chunk per key. A lone ESC (or any unfinished sequence) is
//! released after a short timeout so the escape key still works.

use std::time::{Duration, Instant};

use crate::core::sequence::split_sequences;

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

pub const ESCAPE_TIMEOUT_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinChunk {
    Key(String),
    Paste(String),
}

impl StdinChunk {
    /// The chunk as the terminal sent it, paste markers included.
    pub fn into_wire(self) -> String {
        match self {
            Self::Key(sequence) => sequence,
            Self::Paste(text) => format!("{PASTE_START}{text}{PASTE_END}"),
        }
    }
}

#[derive(Debug)]
pub struct StdinBuffer {
    buffer: String,
    partial_utf8: Vec<u8>,
    paste: Option<String>,
    timeout: Duration,
    flush_deadline: Option<Instant>,
}

impl Default for StdinBuffer {
    fn default() -> Self {
        Self::new(ESCAPE_TIMEOUT_MS)
    }
}

impl StdinBuffer {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            partial_utf8: Vec::new(),
            paste: None,
            timeout: Duration::from_millis(timeout_ms),
            flush_deadline: None,
        }
    }

    pub fn process(&mut self, bytes: &[u8], now: Instant) -> Vec<StdinChunk> {
        self.flush_deadline = None;
        let text = self.decode(bytes);
        let mut chunks = Vec::new();
        self.process_str(&text, &mut chunks);
        if !self.buffer.is_empty() {
            self.flush_deadline = Some(now + self.timeout);
        }
        chunks
    }

    /// Releases a held escape tail once its deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> Vec<StdinChunk> {
        match self.flush_deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => Vec::new(),
        }
    }

    pub fn flush(&mut self) -> Vec<StdinChunk> {
        self.flush_deadline = None;
        if self.buffer.is_empty() {
            return Vec::new();
        }
        vec![StdinChunk::Key(std::mem::take(&mut self.buffer))]
    }

    /// Poll timeout that wakes up in time for a pending flush.
    pub fn next_timeout_ms(&self, now: Instant, default_ms: i32) -> i32 {
        match self.flush_deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(now).as_millis();
                (remaining.min(i32::MAX as u128) as i32).min(default_ms)
            }
            None => default_ms,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.partial_utf8.clear();
        self.paste = None;
        self.flush_deadline = None;
    }

    pub fn pending(&self) -> &str {
        &self.buffer
    }

    fn decode(&mut self, bytes: &[u8]) -> String {
        self.partial_utf8.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.partial_utf8) {
            Ok(_) => self.partial_utf8.len(),
            // A character cut off at the end of the read waits for the next one.
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(_) => self.partial_utf8.len(),
        };
        let rest = self.partial_utf8.split_off(valid);
        let text = String::from_utf8_lossy(&self.partial_utf8).into_owned();
        self.partial_utf8 = rest;
        text
    }

    fn process_str(&mut self, data: &str, chunks: &mut Vec<StdinChunk>) {
        if let Some(mut pasted) = self.paste.take() {
            pasted.push_str(data);
            match pasted.find(PASTE_END) {
                Some(end) => {
                    let rest = pasted[end + PASTE_END.len()..].to_string();
                    pasted.truncate(end);
                    chunks.push(StdinChunk::Paste(pasted));
                    if !rest.is_empty() {
                        self.process_str(&rest, chunks);
                    }
                }
                None => self.paste = Some(pasted),
            }
            return;
        }

        self.buffer.push_str(data);
        if let Some(start) = self.buffer.find(PASTE_START) {
            let before = self.buffer[..start].to_string();
            let after = self.buffer[start + PASTE_START.len()..].to_string();
            self.buffer.clear();

            let split = split_sequences(&before);
            chunks.extend(split.sequences.into_iter().map(StdinChunk::Key));
            if !split.remainder.is_empty() {
                chunks.push(StdinChunk::Key(split.remainder));
            }

            self.paste = Some(String::new());
            self.process_str(&after, chunks);
            return;
        }

        let split = split_sequences(&self.buffer);
        self.buffer = split.remainder;
        chunks.extend(split.sequences.into_iter().map(StdinChunk::Key));
    }
}
