//! # tinyfmt-core
//!
//! Freestanding printf-style formatting.
//!
//! Numbers are converted to text without `core::fmt`, fields are padded and
//! buffered, and the result is pushed through a caller-supplied [`Sink`]. No
//! `unsafe` code is permitted at the crate level.
//!
//! ```
//! use tinyfmt_core::{FormatArg, format_to_vec};
//!
//! let out = format_to_vec(b"'%10.2f'", &[FormatArg::Float(3.14159)]).unwrap();
//! assert_eq!(out, b"'      3.14'");
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod stdio;
pub mod stdlib;

pub use config::{ArgumentPolicy, FormatConfig};
pub use error::{FormatError, SinkError};
pub use stdio::{
    ArgKind, FormatArg, FormatToSlice, Formatter, IoSink, Sink, SliceSink, format,
    format_to_slice, format_to_vec, global_printf, init_global, is_global_initialized,
};
