//! Formatted output.
//!
//! Directive parsing, argument handling, buffering, sinks and the printf
//! state machine.

pub mod args;
pub mod buffer;
pub mod global;
pub mod printf;
pub mod sink;
pub mod spec;

pub use args::{ArgKind, ArgumentCursor, FormatArg};
pub use buffer::OutputBuffer;
pub use global::{global_printf, init_global, is_global_initialized};
pub use printf::{FormatToSlice, Formatter, format, format_to_slice, format_to_vec};
pub use sink::{IoSink, Sink, SliceSink};
pub use spec::{
    Conversion, FormatSegment, FormatSegments, FormatSpec, MAX_FIELD, parse_format_spec,
};
