// All extern "C" exports accept raw pointers from C callers and document their
// contract once in the header-level docs below.
#![allow(clippy::missing_safety_doc)]
//! # tinyfmt-abi
//!
//! `extern "C"` boundary for tinyfmt.
//!
//! C has no portable way to hand a `va_list` to Rust on stable, so callers
//! pass an explicit array of tagged arguments instead:
//!
//! ```text
//! TinyfmtArg args[] = {
//!     { TINYFMT_INT,  { .i = 42 } },
//!     { TINYFMT_TEXT, { .s = "answer" } },
//! };
//! tinyfmt_printf("%d is the %s\n", args, 2);
//! ```
//!
//! Every entry point returns the byte count on success and `-1` with `errno`
//! set on failure: `EINVAL` for a null format, a bad tag or (strict mode) an
//! argument that does not match its directive; the write error, or `EIO`,
//! when the output cannot be delivered (even if part of it already was);
//! `EOVERFLOW` when the count does not fit in an `int`.
//!
//! `fmt` and every `TINYFMT_TEXT` pointer must be NUL-terminated or null;
//! `args` must point to `nargs` readable entries.

pub mod args_abi;
pub mod fd_sink;
pub mod printf_abi;

pub use args_abi::{
    TINYFMT_CHAR, TINYFMT_FLOAT, TINYFMT_INT, TINYFMT_POINTER, TINYFMT_TEXT, TINYFMT_UNSIGNED,
    TinyfmtArg, TinyfmtValue,
};
pub use fd_sink::FdSink;

#[inline]
pub(crate) unsafe fn set_abi_errno(val: libc::c_int) {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let p = unsafe { libc::__errno_location() };
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    let p = unsafe { libc::__error() };
    unsafe { *p = val };
}
