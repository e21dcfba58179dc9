//! Sink over a raw file descriptor.

use std::ffi::c_int;

use tinyfmt_core::{Sink, SinkError};

/// Writes through `libc::write`.
///
/// Retries on `EINTR` and loops on short writes, so a successful call has
/// delivered everything. If the descriptor stops accepting data midway the
/// errno is kept and wrapped in [`SinkError::Partial`] with the byte count
/// that got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdSink {
    fd: c_int,
}

impl FdSink {
    pub const STDOUT: FdSink = FdSink {
        fd: libc::STDOUT_FILENO,
    };

    #[must_use]
    pub const fn new(fd: c_int) -> Self {
        Self { fd }
    }

    #[must_use]
    pub const fn fd(&self) -> c_int {
        self.fd
    }
}

impl Sink for FdSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        let mut done = 0;
        while done < bytes.len() {
            let rest = &bytes[done..];
            // SAFETY: `rest` is a live slice of exactly `rest.len()` bytes.
            let rc = unsafe { libc::write(self.fd, rest.as_ptr().cast(), rest.len()) };
            if rc < 0 {
                let errno = std::io::Error::last_os_error()
                    .raw_os_error()
                    .unwrap_or(libc::EIO);
                if errno == libc::EINTR {
                    continue;
                }
                return Err(SinkError::partial(done, SinkError::Errno(errno)));
            }
            if rc == 0 {
                return Err(SinkError::partial(done, SinkError::Closed));
            }
            done += rc as usize;
        }
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe() -> (c_int, c_int) {
        let mut fds = [0 as c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        (fds[0], fds[1])
    }

    #[test]
    fn writes_reach_the_descriptor() {
        let (r, w) = pipe();
        let mut sink = FdSink::new(w);
        assert_eq!(sink.write(b"piped").unwrap(), 5);
        let mut buf = [0u8; 16];
        let n = unsafe { libc::read(r, buf.as_mut_ptr().cast(), buf.len()) };
        assert_eq!(&buf[..n as usize], b"piped");
        unsafe {
            libc::close(r);
            libc::close(w);
        }
    }

    #[test]
    fn bad_descriptor_reports_errno() {
        let mut sink = FdSink::new(-1);
        assert!(matches!(
            sink.write(b"x"),
            Err(SinkError::Errno(e)) if e == libc::EBADF
        ));
        assert_eq!(sink.write(b"").unwrap(), 0);
    }

    #[test]
    fn full_nonblocking_pipe_keeps_errno_and_count() {
        let (r, w) = pipe();
        unsafe {
            let flags = libc::fcntl(w, libc::F_GETFL);
            assert_eq!(libc::fcntl(w, libc::F_SETFL, flags | libc::O_NONBLOCK), 0);
        }
        let mut sink = FdSink::new(w);
        let big = vec![b'x'; 1 << 20];
        let err = sink.write(&big).unwrap_err();
        match err {
            SinkError::Partial { accepted, source } => {
                assert!(accepted > 0 && accepted < big.len());
                assert!(matches!(*source, SinkError::Errno(e) if e == libc::EAGAIN));
            }
            other => panic!("unexpected {other:?}"),
        }
        // Nothing drained the pipe, so the next write fails outright.
        assert!(matches!(
            sink.write(b"y"),
            Err(SinkError::Errno(e)) if e == libc::EAGAIN
        ));
        unsafe {
            libc::close(r);
            libc::close(w);
        }
    }
}
