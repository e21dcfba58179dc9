//! Output accumulator between the formatter and its sink.
//!
//! Invariants:
//! - `data.len() <= capacity` (capacity is fixed at creation)
//! - `flushed` only grows, by exactly what the sink reported accepting
//!
//! Appends that do not fit flush first. A piece larger than the whole
//! buffer is streamed through in capacity-sized chunks, so memory stays
//! bounded whatever the field width.

use crate::config::FormatConfig;
use crate::error::{FormatError, SinkError};
use crate::metrics::{FormatMetrics, global_metrics};
use crate::stdio::sink::Sink;

#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
    capacity: usize,
    flush_threshold: usize,
    /// Bytes the sink has accepted over the buffer's lifetime.
    flushed: usize,
}

impl OutputBuffer {
    /// `flush_threshold` is clamped to `1..=capacity`; capacity is at least 1.
    #[must_use]
    pub fn new(capacity: usize, flush_threshold: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            flush_threshold: flush_threshold.clamp(1, capacity),
            flushed: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &FormatConfig) -> Self {
        Self::new(config.capacity(), config.flush_threshold())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    /// Pending, not yet flushed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub const fn total_flushed(&self) -> usize {
        self.flushed
    }

    /// True once the pending length has passed the threshold.
    #[must_use]
    pub fn needs_flush(&self) -> bool {
        self.data.len() > self.flush_threshold
    }

    pub fn push<S: Sink + ?Sized>(&mut self, sink: &mut S, byte: u8) -> Result<(), FormatError> {
        if self.data.len() == self.capacity {
            self.flush(sink)?;
        }
        self.data.push(byte);
        Ok(())
    }

    pub fn extend<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        mut bytes: &[u8],
    ) -> Result<(), FormatError> {
        while !bytes.is_empty() {
            let n = self.reserve_chunk(sink, bytes.len())?;
            self.data.extend_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
        }
        Ok(())
    }

    /// Append `count` copies of `byte` (padding and zero fill).
    pub fn fill<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        byte: u8,
        mut count: usize,
    ) -> Result<(), FormatError> {
        while count > 0 {
            let n = self.reserve_chunk(sink, count)?;
            self.data.resize(self.data.len() + n, byte);
            count -= n;
        }
        Ok(())
    }

    /// Hand pending bytes to the sink. Returns the count it accepted.
    ///
    /// An empty buffer never calls the sink. The sink gets exactly one
    /// attempt: a count short of the pending length fails the call with
    /// `SinkError::Short`, and `written` in every sink failure includes
    /// whatever part of this write the host took. Nothing after a short
    /// write is ever delivered, so the host holds a contiguous prefix.
    pub fn flush<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<usize, FormatError> {
        if self.data.is_empty() {
            return Ok(0);
        }
        let metrics = global_metrics();
        let result = sink.write(&self.data);
        let pending = self.data.len();
        self.data.clear();
        FormatMetrics::inc(&metrics.flushes);

        let (accepted, failure) = match result {
            Ok(n) if n >= pending => (pending, None),
            Ok(n) => (
                n,
                Some(SinkError::Short {
                    accepted: n,
                    offered: pending,
                }),
            ),
            Err(source) => (source.accepted().min(pending), Some(source)),
        };
        self.flushed += accepted;
        FormatMetrics::add(&metrics.bytes_written, accepted as u64);

        match failure {
            None => Ok(accepted),
            Some(source) => {
                FormatMetrics::inc(&metrics.sink_failures);
                Err(FormatError::Sink {
                    written: self.flushed,
                    source,
                })
            }
        }
    }

    /// Make room for up to `wanted` bytes and return how many fit now.
    fn reserve_chunk<S: Sink + ?Sized>(
        &mut self,
        sink: &mut S,
        wanted: usize,
    ) -> Result<usize, FormatError> {
        let room = self.capacity - self.data.len();
        if wanted > room && !self.data.is_empty() {
            self.flush(sink)?;
        }
        Ok(wanted.min(self.capacity - self.data.len()))
    }
}
