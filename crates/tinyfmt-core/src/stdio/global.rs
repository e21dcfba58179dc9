//! Process-wide formatter for `printf`-style convenience.
//!
//! Bound once to a sink with [`init_global`]. Calls are serialised by a
//! mutex, so the output of one call is never interleaved with another's.

use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::config::FormatConfig;
use crate::error::FormatError;
use crate::stdio::args::FormatArg;
use crate::stdio::printf::Formatter;
use crate::stdio::sink::Sink;

struct GlobalFormatter {
    formatter: Formatter,
    sink: Box<dyn Sink + Send>,
}

static GLOBAL: OnceLock<Mutex<GlobalFormatter>> = OnceLock::new();

/// Bind the global formatter. Fails with
/// [`FormatError::AlreadyInitialized`] on every call after the first.
pub fn init_global(sink: Box<dyn Sink + Send>, config: FormatConfig) -> Result<(), FormatError> {
    GLOBAL
        .set(Mutex::new(GlobalFormatter {
            formatter: Formatter::new(config),
            sink,
        }))
        .map_err(|_| FormatError::AlreadyInitialized)
}

#[must_use]
pub fn is_global_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Format through the global sink.
pub fn global_printf(fmt: &[u8], args: &[FormatArg<'_>]) -> Result<usize, FormatError> {
    let global = GLOBAL.get().ok_or(FormatError::NotInitialized)?;
    let mut guard = global.lock();
    let GlobalFormatter { formatter, sink } = &mut *guard;
    formatter.format(sink.as_mut(), fmt, args)
}
