//! printf formatting engine.
//!
//! Walks the format string once. Literal runs are copied into an
//! [`OutputBuffer`]; each `%` directive is parsed, its argument pulled from an
//! [`ArgumentCursor`], rendered through the numeric converters and
//! right-aligned in its field. The buffer is flushed to the [`Sink`] whenever
//! it passes the configured threshold and once more at the end.
//!
//! Supported conversions: `d i u x X c s f p %`. Any other byte after the
//! width/precision is printed back as `%` followed by that byte.
//!
//! Design invariant: memory per call is bounded by the buffer capacity. Wide
//! fields and long zero fills are streamed, never materialised.

use crate::config::{FormatConfig, global_config};
use crate::error::{FormatError, SinkError};
use crate::metrics::{FormatMetrics, global_metrics};
use crate::stdio::args::{ArgumentCursor, FormatArg};
use crate::stdio::buffer::OutputBuffer;
use crate::stdio::sink::Sink;
use crate::stdio::spec::{Conversion, FormatSegment, FormatSegments, FormatSpec};
use crate::stdlib::conversion::{
    Base, fixed_point_to_text, integer_to_text, unsigned_to_text, unsigned_to_text_u64,
};

/// Fraction digits for `%f` without an explicit precision.
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Rendered for a null `%s` argument. Never truncated by precision.
pub const NULL_TEXT: &[u8] = b"(null)";

const POINTER_PREFIX: &[u8] = b"0x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Pulling the next segment.
    Scanning,
    /// A directive is ready to render.
    InSpecifier(FormatSpec),
    /// Buffer passed its threshold.
    Flushing,
}

impl ScanState {
    fn after_append(buffer: &OutputBuffer) -> Self {
        if buffer.needs_flush() {
            Self::Flushing
        } else {
            Self::Scanning
        }
    }
}

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

/// Stateless formatting front end. All per-call state lives on the stack of
/// [`Formatter::format`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    config: FormatConfig,
}

impl Formatter {
    #[must_use]
    pub const fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    /// Formatter using the cached environment configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(global_config())
    }

    #[must_use]
    pub const fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Format `fmt` with `args` into `sink`.
    ///
    /// Returns the number of bytes the sink accepted. Under the strict policy
    /// the arguments are validated against the whole format before anything
    /// is written, so an argument error never leaves partial output. A sink
    /// failure aborts the call and reports the bytes delivered before it.
    pub fn format<S: Sink + ?Sized>(
        &self,
        sink: &mut S,
        fmt: &[u8],
        args: &[FormatArg<'_>],
    ) -> Result<usize, FormatError> {
        let metrics = global_metrics();
        FormatMetrics::inc(&metrics.calls);

        let policy = self.config.policy();
        if !policy.repairs_enabled() {
            if let Err(err) = check_arguments(fmt, args) {
                FormatMetrics::inc(&metrics.argument_errors);
                return Err(err);
            }
        }

        let mut cursor = ArgumentCursor::with_policy(args, policy);
        let mut buffer = OutputBuffer::from_config(&self.config);
        let mut segments = FormatSegments::new(fmt);
        let mut state = ScanState::Scanning;

        loop {
            state = match state {
                ScanState::Scanning => match segments.next() {
                    Some(FormatSegment::Literal(text)) => {
                        buffer.extend(sink, text)?;
                        ScanState::after_append(&buffer)
                    }
                    Some(FormatSegment::Spec(spec)) => ScanState::InSpecifier(spec),
                    None => break,
                },
                ScanState::InSpecifier(spec) => {
                    render(&mut buffer, sink, &spec, &mut cursor)?;
                    ScanState::after_append(&buffer)
                }
                ScanState::Flushing => {
                    buffer.flush(sink)?;
                    ScanState::Scanning
                }
            };
        }
        buffer.flush(sink)?;
        Ok(buffer.total_flushed())
    }
}

/// Validate every directive of `fmt` against `args` under the strict policy
/// without rendering anything.
pub fn check_arguments(fmt: &[u8], args: &[FormatArg<'_>]) -> Result<(), FormatError> {
    let mut cursor = ArgumentCursor::new(args);
    for segment in FormatSegments::new(fmt) {
        if let FormatSegment::Spec(spec) = segment {
            cursor.skip(spec.conversion)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

fn render<S: Sink + ?Sized>(
    buffer: &mut OutputBuffer,
    sink: &mut S,
    spec: &FormatSpec,
    cursor: &mut ArgumentCursor<'_>,
) -> Result<(), FormatError> {
    let conv = spec.conversion;
    let width = spec.width;

    match spec.kind() {
        Conversion::Signed => {
            let text = integer_to_text(cursor.next_int(conv)?, Base::DECIMAL);
            emit_field(buffer, sink, width, b"", text.as_bytes(), 0)
        }
        Conversion::Unsigned => {
            let text = unsigned_to_text(cursor.next_unsigned(conv)?, Base::DECIMAL);
            emit_field(buffer, sink, width, b"", text.as_bytes(), 0)
        }
        Conversion::HexLower => {
            let text = unsigned_to_text(cursor.next_unsigned(conv)?, Base::HEX);
            emit_field(buffer, sink, width, b"", text.as_bytes(), 0)
        }
        Conversion::HexUpper => {
            let text = unsigned_to_text(cursor.next_unsigned(conv)?, Base::HEX).uppercase_hex();
            emit_field(buffer, sink, width, b"", text.as_bytes(), 0)
        }
        Conversion::Char => {
            let byte = cursor.next_char(conv)?;
            emit_field(buffer, sink, width, b"", &[byte], 0)
        }
        Conversion::Str => {
            let body = match cursor.next_text(conv)? {
                Some(text) => {
                    let n = spec.precision.map_or(text.len(), |p| p.min(text.len()));
                    &text[..n]
                }
                None => {
                    FormatMetrics::inc(&global_metrics().null_strings);
                    NULL_TEXT
                }
            };
            emit_field(buffer, sink, width, b"", body, 0)
        }
        Conversion::Fixed => {
            let value = cursor.next_float(conv)?;
            let text = fixed_point_to_text(
                value,
                spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
            );
            emit_field(buffer, sink, width, b"", text.digits.as_bytes(), text.zero_fill)
        }
        Conversion::Pointer => {
            let text = unsigned_to_text_u64(cursor.next_pointer(conv)? as u64, Base::HEX);
            emit_field(buffer, sink, width, POINTER_PREFIX, text.as_bytes(), 0)
        }
        Conversion::Percent => emit_field(buffer, sink, width, b"", b"%", 0),
        Conversion::Unknown(byte) => {
            FormatMetrics::inc(&global_metrics().malformed_specifiers);
            emit_field(buffer, sink, width, b"%", &[byte], 0)
        }
    }
}

/// Right-align `head`, `body` and `zero_fill` trailing zeros in a field of
/// at least `width` bytes.
fn emit_field<S: Sink + ?Sized>(
    buffer: &mut OutputBuffer,
    sink: &mut S,
    width: usize,
    head: &[u8],
    body: &[u8],
    zero_fill: usize,
) -> Result<(), FormatError> {
    let natural = head
        .len()
        .saturating_add(body.len())
        .saturating_add(zero_fill);
    buffer.fill(sink, b' ', width.saturating_sub(natural))?;
    buffer.extend(sink, head)?;
    buffer.extend(sink, body)?;
    buffer.fill(sink, b'0', zero_fill)
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Format into `sink` with the environment configuration.
pub fn format<S: Sink + ?Sized>(
    sink: &mut S,
    fmt: &[u8],
    args: &[FormatArg<'_>],
) -> Result<usize, FormatError> {
    Formatter::with_defaults().format(sink, fmt, args)
}

/// Format into a fresh `Vec`.
pub fn format_to_vec(fmt: &[u8], args: &[FormatArg<'_>]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    format(&mut out, fmt, args)?;
    Ok(out)
}

/// Result of [`format_to_slice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatToSlice {
    /// Bytes stored in the destination.
    pub written: usize,
    /// Length the complete output would have had.
    pub total: usize,
}

impl FormatToSlice {
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.written < self.total
    }
}

/// snprintf-style formatting: stores as much as fits in `dst` and reports the
/// full length. No terminator is written.
pub fn format_to_slice(
    dst: &mut [u8],
    fmt: &[u8],
    args: &[FormatArg<'_>],
) -> Result<FormatToSlice, FormatError> {
    Formatter::with_defaults().format_to_slice(dst, fmt, args)
}

impl Formatter {
    /// See [`format_to_slice`].
    pub fn format_to_slice(
        &self,
        dst: &mut [u8],
        fmt: &[u8],
        args: &[FormatArg<'_>],
    ) -> Result<FormatToSlice, FormatError> {
        let mut sink = TruncatingSink { dst, written: 0 };
        let total = self.format(&mut sink, fmt, args)?;
        Ok(FormatToSlice {
            written: sink.written,
            total,
        })
    }
}

/// Keeps the prefix that fits and claims to accept everything, so the
/// formatter's count is the untruncated length.
struct TruncatingSink<'a> {
    dst: &'a mut [u8],
    written: usize,
}

impl Sink for TruncatingSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        let room = self.dst.len() - self.written;
        let n = room.min(bytes.len());
        self.dst[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArgumentPolicy;

    fn render_with(config: FormatConfig, fmt: &str, args: &[FormatArg<'_>]) -> String {
        let mut out = Vec::new();
        let n = Formatter::new(config)
            .format(&mut out, fmt.as_bytes(), args)
            .unwrap();
        assert_eq!(n, out.len());
        String::from_utf8(out).unwrap()
    }

    fn strict(fmt: &str, args: &[FormatArg<'_>]) -> String {
        render_with(FormatConfig::default(), fmt, args)
    }

    fn hardened(fmt: &str, args: &[FormatArg<'_>]) -> String {
        render_with(FormatConfig::new(ArgumentPolicy::Hardened), fmt, args)
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(strict("Integer: %d\n", &[12345.into()]), "Integer: 12345\n");
        assert_eq!(strict("%i", &[(-789).into()]), "-789");
        assert_eq!(strict("%d", &[i32::MIN.into()]), "-2147483648");
    }

    #[test]
    fn test_format_width_pad() {
        assert_eq!(strict("'%10d'", &[123.into()]), "'       123'");
        assert_eq!(strict("'%2d'", &[12345.into()]), "'12345'");
        assert_eq!(strict("'%05d'", &[42.into()]), "'   42'");
    }

    #[test]
    fn test_format_unsigned_hex() {
        assert_eq!(strict("%u", &[50000u32.into()]), "50000");
        assert_eq!(strict("%x", &[255u32.into()]), "ff");
        assert_eq!(strict("%X", &[255u32.into()]), "FF");
        assert_eq!(strict("%x", &[(-1).into()]), "ffffffff");
        assert_eq!(strict("%u", &[(-1).into()]), "4294967295");
    }

    #[test]
    fn test_format_char() {
        assert_eq!(strict("[%c]", &[b'A'.into()]), "[A]");
        assert_eq!(strict("[%3c]", &[b'!'.into()]), "[  !]");
    }

    #[test]
    fn test_format_str() {
        assert_eq!(strict("%s", &["Hello, World!".into()]), "Hello, World!");
        assert_eq!(strict("%.3s", &["abcdef".into()]), "abc");
        assert_eq!(strict("%.10s", &["abc".into()]), "abc");
        assert_eq!(strict("'%8.2s'", &["abcdef".into()]), "'      ab'");
    }

    #[test]
    fn test_format_null_str_ignores_precision() {
        assert_eq!(strict("%s", &[FormatArg::Text(None)]), "(null)");
        assert_eq!(strict("%.2s", &[FormatArg::Text(None)]), "(null)");
        assert_eq!(strict("%8s", &[FormatArg::Text(None)]), "  (null)");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(strict("%f", &[3.14159.into()]), "3.141590");
        assert_eq!(strict("'%.2f'", &[3.14159.into()]), "'3.14'");
        assert_eq!(strict("'%10.2f'", &[3.14159.into()]), "'      3.14'");
        assert_eq!(strict("%.0f", &[2.9.into()]), "2");
        assert_eq!(strict("%.1f", &[(-2.5).into()]), "-2.5");
    }

    #[test]
    fn test_format_float_zero_fill_past_scaled_digits() {
        let out = strict("%.25f", &[0.5.into()]);
        assert_eq!(out.len(), 2 + 25);
        assert!(out.starts_with("0.5"));
        assert!(out[3..].bytes().all(|b| b == b'0'));
    }

    #[test]
    fn test_format_pointer() {
        assert_eq!(strict("%p", &[FormatArg::Pointer(0x1000)]), "0x1000");
        assert_eq!(strict("%p", &[FormatArg::Pointer(0)]), "0x0");
        assert_eq!(strict("'%8p'", &[FormatArg::Pointer(0xab)]), "'    0xab'");
    }

    #[test]
    fn test_percent_and_unknown() {
        assert_eq!(strict("100%%", &[]), "100%");
        assert_eq!(strict("[%3%]", &[]), "[  %]");
        assert_eq!(strict("%q", &[]), "%q");
        assert_eq!(strict("[%4y]", &[]), "[  %y]");
        assert_eq!(strict("%-5d", &[]), "%-5d");
    }

    #[test]
    fn test_trailing_and_cut_off_directives() {
        assert_eq!(strict("50%", &[]), "50%");
        assert_eq!(strict("x%12.", &[]), "x%12.");
        assert_eq!(strict("%", &[]), "%");
    }

    #[test]
    fn test_mixed_arguments() {
        let out = strict(
            "Mixed: %d %s %c\n",
            &[42.into(), "is the answer".into(), b'!'.into()],
        );
        assert_eq!(out, "Mixed: 42 is the answer !\n");
        let out = strict(
            "%d, %d, %d, %d",
            &[1.into(), 2.into(), 3.into(), 4.into()],
        );
        assert_eq!(out, "1, 2, 3, 4");
    }

    #[test]
    fn test_surplus_arguments_ignored() {
        assert_eq!(strict("%d", &[1.into(), 2.into()]), "1");
        assert_eq!(strict("plain", &[1.into()]), "plain");
    }

    #[test]
    fn test_empty_format_writes_nothing() {
        assert_eq!(strict("", &[]), "");
    }

    #[test]
    fn test_strict_rejects_before_writing() {
        let mut out = Vec::new();
        let err = Formatter::default()
            .format(&mut out, b"ok %d then %f", &[1.into(), 2.into()])
            .unwrap_err();
        assert!(err.is_argument_error());
        assert!(out.is_empty());

        let err = Formatter::default()
            .format(&mut out, b"%s %s", &["one".into()])
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::MissingArgument {
                index: 1,
                conversion: 's'
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_hardened_repairs() {
        assert_eq!(hardened("%d|%s|%f", &[]), "0|(null)|0.000000");
        assert_eq!(hardened("%s", &[7.into()]), "(null)");
        assert_eq!(hardened("%.1f", &[3.into()]), "3.0");
    }

    #[test]
    fn test_flush_threshold_splits_writes() {
        #[derive(Default)]
        struct Chunks(Vec<usize>);
        impl Sink for Chunks {
            fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
                self.0.push(bytes.len());
                Ok(bytes.len())
            }
        }

        let config = FormatConfig::default()
            .with_capacity(64)
            .with_flush_threshold(10);
        let mut sink = Chunks::default();
        let n = Formatter::new(config)
            .format(&mut sink, b"0123456789ab%d", &[5.into()])
            .unwrap();
        assert_eq!(n, 13);
        assert_eq!(sink.0, vec![12, 1]);
    }

    #[test]
    fn test_wide_field_streams() {
        let config = FormatConfig::default().with_capacity(64);
        let out = render_with(config, "%1000d", &[7.into()]);
        assert_eq!(out.len(), 1000);
        assert!(out.ends_with(" 7"));
    }

    #[test]
    fn test_format_to_slice_truncates() {
        let mut dst = [0u8; 5];
        let res = Formatter::default()
            .format_to_slice(&mut dst, b"value=%d", &[1234.into()])
            .unwrap();
        assert_eq!(res, FormatToSlice { written: 5, total: 10 });
        assert!(res.truncated());
        assert_eq!(&dst, b"value");
    }

    #[test]
    fn test_check_arguments() {
        assert!(check_arguments(b"%d %s %%", &[1.into(), "x".into()]).is_ok());
        assert!(check_arguments(b"%p", &[1.into()]).is_err());
        assert!(check_arguments(b"%q %", &[]).is_ok());
    }
}
