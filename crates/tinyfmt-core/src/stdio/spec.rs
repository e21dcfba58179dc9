//! Format directive parser.
//!
//! Grammar accepted after a `%`:
//!
//! ```text
//! directive := width? ('.' precision?)? conversion
//! width     := [0-9]+
//! precision := [0-9]*
//! ```
//!
//! There are no flags, `*` widths or length modifiers. Any byte in the
//! conversion position is accepted; unknown ones are classified as
//! [`Conversion::Unknown`] and rendered literally by the formatter.

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Upper bound for a parsed width or precision: `INT_MAX`, as C printf
/// implementations use. Larger digit runs clamp to it.
pub const MAX_FIELD: usize = i32::MAX as usize;

/// Reserved for `-`, `+`, `0`, `#` and space. Never set by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    bits: u8,
}

impl FormatFlags {
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

/// What a conversion byte asks the formatter to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d`, `i`
    Signed,
    /// `u`
    Unsigned,
    /// `x`
    HexLower,
    /// `X`
    HexUpper,
    /// `c`
    Char,
    /// `s`
    Str,
    /// `f`
    Fixed,
    /// `p`
    Pointer,
    /// `%`
    Percent,
    Unknown(u8),
}

impl Conversion {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'd' | b'i' => Self::Signed,
            b'u' => Self::Unsigned,
            b'x' => Self::HexLower,
            b'X' => Self::HexUpper,
            b'c' => Self::Char,
            b's' => Self::Str,
            b'f' => Self::Fixed,
            b'p' => Self::Pointer,
            b'%' => Self::Percent,
            other => Self::Unknown(other),
        }
    }

    /// Whether rendering this conversion pulls one argument.
    #[must_use]
    pub const fn consumes_argument(self) -> bool {
        !matches!(self, Self::Percent | Self::Unknown(_))
    }
}

/// A parsed directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// The raw conversion byte.
    pub conversion: u8,
    /// Minimum field width; 0 when none was given.
    pub width: usize,
    /// `None` means the conversion's default precision.
    pub precision: Option<usize>,
    pub flags: FormatFlags,
}

impl FormatSpec {
    #[must_use]
    pub const fn new(conversion: u8) -> Self {
        Self {
            conversion,
            width: 0,
            precision: None,
            flags: FormatFlags::empty(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Conversion {
        Conversion::from_byte(self.conversion)
    }
}

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a format string
// ---------------------------------------------------------------------------

/// A segment of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Bytes to emit verbatim. Includes a trailing lone `%` and the text of
    /// a directive cut off by the end of the format.
    Literal(&'a [u8]),
    Spec(FormatSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse the directive whose body starts at `fmt[start]` (the byte after
/// `%`).
///
/// Returns the spec and the index of its conversion byte. If the format ends
/// before a conversion byte, the index is `fmt.len()` and the spec's
/// `conversion` is 0; the caller decides what to do with the truncated
/// directive.
#[must_use]
pub fn parse_format_spec(fmt: &[u8], start: usize) -> (FormatSpec, usize) {
    let len = fmt.len();
    let mut pos = start.min(len);
    let mut spec = FormatSpec::new(0);

    let (width, after_width) = scan_decimal(fmt, pos);
    spec.width = width;
    pos = after_width;

    if pos < len && fmt[pos] == b'.' {
        let (precision, after_precision) = scan_decimal(fmt, pos + 1);
        spec.precision = Some(precision);
        pos = after_precision;
    }

    if pos < len {
        spec.conversion = fmt[pos];
    }
    (spec, pos)
}

/// Iterator over the segments of a format string.
///
/// This is the only scanner: the formatter renders from it and the strict
/// argument check walks it, so both always see the same directives.
#[derive(Debug, Clone)]
pub struct FormatSegments<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> FormatSegments<'a> {
    #[must_use]
    pub const fn new(fmt: &'a [u8]) -> Self {
        Self { fmt, pos: 0 }
    }
}

impl<'a> Iterator for FormatSegments<'a> {
    type Item = FormatSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let fmt = self.fmt;
        let len = fmt.len();
        let start = self.pos;
        if start >= len {
            return None;
        }

        if fmt[start] != b'%' {
            let run = fmt[start..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(len, |i| start + i);
            self.pos = run;
            return Some(FormatSegment::Literal(&fmt[start..run]));
        }

        let (spec, conv_at) = parse_format_spec(fmt, start + 1);
        if conv_at >= len {
            // Cut off by the end of the format: copy it as text.
            self.pos = len;
            return Some(FormatSegment::Literal(&fmt[start..]));
        }
        self.pos = conv_at + 1;
        Some(FormatSegment::Spec(spec))
    }
}

/// Split a format string into literal runs and directives.
#[must_use]
pub fn parse_format_string(fmt: &[u8]) -> Vec<FormatSegment<'_>> {
    FormatSegments::new(fmt).collect()
}

/// Consume an ASCII digit run from `pos`, saturating at [`MAX_FIELD`].
fn scan_decimal(fmt: &[u8], mut pos: usize) -> (usize, usize) {
    let mut value = 0usize;
    while pos < fmt.len() && fmt[pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(fmt[pos] - b'0'))
            .min(MAX_FIELD);
        pos += 1;
    }
    (value, pos)
}
