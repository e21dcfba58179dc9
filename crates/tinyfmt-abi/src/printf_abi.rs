//! ABI layer for the printf family.

use std::ffi::{CStr, c_char, c_int};

use tinyfmt_core::{FormatError, Formatter, SinkError};

use crate::args_abi::{TinyfmtArg, decode_args};
use crate::fd_sink::FdSink;
use crate::set_abi_errno;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn errno_for(err: &FormatError) -> c_int {
    match err {
        FormatError::Sink { source, .. } => match source.root() {
            SinkError::Errno(e) => *e,
            SinkError::Io(io) => io.raw_os_error().unwrap_or(libc::EIO),
            SinkError::Full => libc::ENOSPC,
            _ => libc::EIO,
        },
        _ => libc::EINVAL,
    }
}

unsafe fn fail(errno: c_int) -> c_int {
    unsafe { set_abi_errno(errno) };
    -1
}

/// A count past `INT_MAX` cannot be returned: fail with `EOVERFLOW`.
unsafe fn count_or_overflow(n: usize) -> c_int {
    match c_int::try_from(n) {
        Ok(n) => n,
        Err(_) => unsafe { fail(libc::EOVERFLOW) },
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format to a file descriptor.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyfmt_fdprintf(
    fd: c_int,
    fmt: *const c_char,
    args: *const TinyfmtArg,
    nargs: usize,
) -> c_int {
    if fmt.is_null() {
        return unsafe { fail(libc::EINVAL) };
    }
    let fmt = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    let Ok(args) = (unsafe { decode_args(args, nargs) }) else {
        return unsafe { fail(libc::EINVAL) };
    };

    let mut sink = FdSink::new(fd);
    match Formatter::with_defaults().format(&mut sink, fmt, &args) {
        Ok(n) => unsafe { count_or_overflow(n) },
        Err(err) => unsafe { fail(errno_for(&err)) },
    }
}

/// Format to standard output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyfmt_printf(
    fmt: *const c_char,
    args: *const TinyfmtArg,
    nargs: usize,
) -> c_int {
    unsafe { tinyfmt_fdprintf(FdSink::STDOUT.fd(), fmt, args, nargs) }
}

/// C `snprintf` semantics: at most `size - 1` bytes plus a NUL are stored,
/// and the return value is the length of the untruncated output.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tinyfmt_snprintf(
    buf: *mut c_char,
    size: usize,
    fmt: *const c_char,
    args: *const TinyfmtArg,
    nargs: usize,
) -> c_int {
    if fmt.is_null() || (buf.is_null() && size > 0) {
        return unsafe { fail(libc::EINVAL) };
    }
    let fmt = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    let Ok(args) = (unsafe { decode_args(args, nargs) }) else {
        return unsafe { fail(libc::EINVAL) };
    };

    let dst: &mut [u8] = if size == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), size) }
    };
    let body_len = dst.len().saturating_sub(1);
    match Formatter::with_defaults().format_to_slice(&mut dst[..body_len], fmt, &args) {
        Ok(res) => {
            if let Some(terminator) = dst.get_mut(res.written) {
                *terminator = 0;
            }
            unsafe { count_or_overflow(res.total) }
        }
        Err(err) => unsafe { fail(errno_for(&err)) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        let sink = |source| FormatError::Sink { written: 0, source };
        assert_eq!(errno_for(&sink(SinkError::Errno(libc::EPIPE))), libc::EPIPE);
        assert_eq!(errno_for(&sink(SinkError::Closed)), libc::EIO);
        assert_eq!(errno_for(&sink(SinkError::Full)), libc::ENOSPC);
        assert_eq!(errno_for(&FormatError::NotInitialized), libc::EINVAL);
    }

    #[test]
    fn errno_mapping_sees_through_partial_progress() {
        let sink = |source| FormatError::Sink { written: 9, source };
        let partial = SinkError::partial(9, SinkError::Errno(libc::EAGAIN));
        assert_eq!(errno_for(&sink(partial)), libc::EAGAIN);
        let short = SinkError::Short {
            accepted: 1,
            offered: 4,
        };
        assert_eq!(errno_for(&sink(short)), libc::EIO);
        let full = SinkError::partial(3, SinkError::Full);
        assert_eq!(errno_for(&sink(full)), libc::ENOSPC);
    }

    #[test]
    fn oversized_count_is_eoverflow() {
        assert_eq!(unsafe { count_or_overflow(12) }, 12);
        assert_eq!(unsafe { count_or_overflow(c_int::MAX as usize) }, c_int::MAX);
        assert_eq!(unsafe { count_or_overflow(c_int::MAX as usize + 1) }, -1);
        assert_eq!(
            std::io::Error::last_os_error().raw_os_error(),
            Some(libc::EOVERFLOW)
        );
    }
}
