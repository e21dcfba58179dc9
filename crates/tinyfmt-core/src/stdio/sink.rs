//! Byte sinks: where formatted output ends up.

use std::io;

use crate::error::SinkError;

/// Host write primitive.
///
/// `write` gets one attempt per chunk and should accept all of `bytes`. A
/// short `Ok` count fails the formatting call; nothing is resubmitted. A
/// sink that delivers part of a chunk before failing reports that count
/// through [`SinkError::Partial`] so the caller's byte total stays exact.
pub trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError>;
}

impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        (**self).write(bytes)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        (**self).write(bytes)
    }
}

/// Adapter for any [`io::Write`] (stdout, files, sockets).
///
/// Loops until the whole chunk is written. An error after some progress is
/// wrapped in [`SinkError::Partial`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        let mut done = 0;
        while done < bytes.len() {
            match self.inner.write(&bytes[done..]) {
                Ok(0) => return Err(SinkError::partial(done, SinkError::Closed)),
                Ok(n) => done += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(SinkError::partial(done, SinkError::Io(e))),
            }
        }
        self.inner
            .flush()
            .map_err(|e| SinkError::partial(done, SinkError::Io(e)))?;
        Ok(bytes.len())
    }
}

/// Writes into a caller-provided slice.
///
/// Fills as much as fits. A write that overruns the slice stores the
/// prefix that fits and fails with [`SinkError::Full`], wrapped in
/// [`SinkError::Partial`] when some of it landed.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Sink for SliceSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        if bytes.is_empty() {
            return Ok(0);
        }
        let room = self.buf.len() - self.pos;
        if room == 0 {
            return Err(SinkError::Full);
        }
        let n = room.min(bytes.len());
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
        if n < bytes.len() {
            return Err(SinkError::partial(n, SinkError::Full));
        }
        Ok(n)
    }
}
