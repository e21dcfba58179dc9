//! Error types for formatting calls and sink I/O.

use thiserror::Error;

use crate::stdio::args::ArgKind;

/// Failure reported by a [`Sink`](crate::stdio::sink::Sink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Host write primitive failed with this errno.
    #[error("host write failed with errno {0}")]
    Errno(i32),
    #[error("sink has no room left")]
    Full,
    #[error("sink is closed")]
    Closed,
    /// `write` returned fewer bytes than it was offered.
    #[error("sink accepted {accepted} of {offered} bytes")]
    Short { accepted: usize, offered: usize },
    /// The sink took `accepted` bytes of this write, then failed.
    #[error("sink failed after accepting {accepted} bytes: {source}")]
    Partial {
        accepted: usize,
        #[source]
        source: Box<SinkError>,
    },
}

impl SinkError {
    /// Wrap `source` with the progress made before it, if any.
    #[must_use]
    pub fn partial(accepted: usize, source: SinkError) -> Self {
        if accepted == 0 {
            source
        } else {
            Self::Partial {
                accepted,
                source: Box::new(source),
            }
        }
    }

    /// Bytes of the failing write that reached the host.
    #[must_use]
    pub fn accepted(&self) -> usize {
        match self {
            Self::Short { accepted, .. } | Self::Partial { accepted, .. } => *accepted,
            _ => 0,
        }
    }

    /// The failure underneath any partial-progress wrapper.
    #[must_use]
    pub fn root(&self) -> &SinkError {
        match self {
            Self::Partial { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Failure of a whole formatting call.
///
/// Malformed specifiers and null string arguments are not errors: they are
/// rendered as `%<c>` and `(null)` respectively.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The sink rejected a write. `written` bytes had already been accepted
    /// and stay delivered to the host.
    #[error("sink failed after {written} bytes: {source}")]
    Sink {
        written: usize,
        #[source]
        source: SinkError,
    },
    /// Strict mode: a specifier has no argument left to consume.
    #[error("argument {index} missing for %{conversion}")]
    MissingArgument { index: usize, conversion: char },
    /// Strict mode: the argument's variant does not match the specifier.
    #[error("argument {index} for %{conversion} expects {expected}, found {found}")]
    ArgumentMismatch {
        index: usize,
        conversion: char,
        expected: ArgKind,
        found: ArgKind,
    },
    #[error("global formatter is not initialized")]
    NotInitialized,
    #[error("global formatter is already initialized")]
    AlreadyInitialized,
}

impl FormatError {
    /// Bytes the sink accepted before the call failed.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        match self {
            Self::Sink { written, .. } => *written,
            _ => 0,
        }
    }

    /// True for the strict-mode argument checks.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. } | Self::ArgumentMismatch { .. }
        )
    }
}
