//! Numeric text conversion (itoa, utoa, dtoa) and the strict reverse parse.
//!
//! Nothing here goes through `core::fmt`. Digits are produced by repeated
//! division into a fixed stack buffer, least significant first, and then
//! reversed in place.

/// Capacity of a [`NumText`]. Fits 64 binary digits of a `u64`, or a sign,
/// 20 integer digits, a decimal point and [`MAX_SCALED_DIGITS`] fraction
/// digits.
pub const NUM_TEXT_CAPACITY: usize = 64;

/// Fraction digits computed numerically by [`fixed_point_to_text`]. Anything
/// past this is reported as zero fill.
pub const MAX_SCALED_DIGITS: usize = 19;

const POW10: [u64; MAX_SCALED_DIGITS + 1] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Numeric base in the range 2..=36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Base(u8);

impl Base {
    pub const BINARY: Base = Base(2);
    pub const OCTAL: Base = Base(8);
    pub const DECIMAL: Base = Base(10);
    pub const HEX: Base = Base(16);

    /// Returns `None` outside 2..=36.
    #[must_use]
    pub const fn new(radix: u32) -> Option<Self> {
        if radix >= 2 && radix <= 36 {
            Some(Self(radix as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

// ---------------------------------------------------------------------------
// Conversion result
// ---------------------------------------------------------------------------

/// Bounded text produced by one conversion.
///
/// Lives on the stack, is created per specifier and consumed immediately.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NumText {
    buf: [u8; NUM_TEXT_CAPACITY],
    len: usize,
}

impl NumText {
    const fn new() -> Self {
        Self {
            buf: [0u8; NUM_TEXT_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        debug_assert!(self.len < NUM_TEXT_CAPACITY, "NumText overflow");
        if self.len < NUM_TEXT_CAPACITY {
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// The rendered bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Uppercase the `a`..`f` digits of a hex rendering.
    ///
    /// This is the `%X` path: the lowercase text is converted after the
    /// fact rather than rendered with a different digit table.
    #[must_use]
    pub fn uppercase_hex(mut self) -> Self {
        for b in &mut self.buf[..self.len] {
            if (b'a'..=b'f').contains(b) {
                *b = *b - b'a' + b'A';
            }
        }
        self
    }
}

impl AsRef<[u8]> for NumText {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for NumText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("NumText")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

/// Output of [`fixed_point_to_text`].
///
/// `digits` holds the sign, integer part, decimal point and up to
/// [`MAX_SCALED_DIGITS`] fraction digits; `zero_fill` more `'0'` bytes follow
/// it when the requested precision is larger than that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedText {
    pub digits: NumText,
    pub zero_fill: usize,
}

impl FixedText {
    /// Total rendered length including the zero fill.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.digits.len() + self.zero_fill
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialise the full text.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.digits.as_bytes());
        out.resize(self.len(), b'0');
        out
    }
}

// ---------------------------------------------------------------------------
// Integer conversion
// ---------------------------------------------------------------------------

/// Render a signed 32-bit integer.
///
/// Negative values get a leading `-` in base 10 only; in any other base the
/// two's-complement bit pattern is rendered, which is what `%x` of a
/// negative `int` prints.
#[must_use]
pub fn integer_to_text(value: i32, base: Base) -> NumText {
    let mut out = NumText::new();
    if value < 0 && base == Base::DECIMAL {
        out.push(b'-');
        push_digits(&mut out, u64::from(value.unsigned_abs()), base);
    } else {
        push_digits(&mut out, u64::from(value as u32), base);
    }
    out
}

/// Render an unsigned 32-bit integer.
#[must_use]
pub fn unsigned_to_text(value: u32, base: Base) -> NumText {
    unsigned_to_text_u64(u64::from(value), base)
}

/// Render an unsigned 64-bit integer. Used for pointer-sized values.
#[must_use]
pub fn unsigned_to_text_u64(value: u64, base: Base) -> NumText {
    let mut out = NumText::new();
    push_digits(&mut out, value, base);
    out
}

fn push_digits(out: &mut NumText, mut value: u64, base: Base) {
    if value == 0 {
        out.push(b'0');
        return;
    }
    let start = out.len;
    let radix = u64::from(base.get());
    while value != 0 {
        let digit = (value % radix) as u8;
        out.push(if digit < 10 {
            b'0' + digit
        } else {
            b'a' + (digit - 10)
        });
        value /= radix;
    }
    out.buf[start..out.len].reverse();
}

// ---------------------------------------------------------------------------
// Fixed-point conversion
// ---------------------------------------------------------------------------

/// Render `value` with exactly `precision` fraction digits.
///
/// - the integer part is truncated toward zero and saturates at `u64::MAX`;
/// - precision 0 prints the integer part alone, without a decimal point;
/// - the fraction is scaled by `10^precision` and rounded half away from
///   zero (add 0.5, truncate), then left-padded with zeros;
/// - NaN and infinities render as `nan`, `inf` and `-inf`.
///
/// A rounding carry is never propagated into the integer part. If the
/// rounded fraction reaches `10^precision` it is held at all nines, so
/// `0.9999995` at precision 2 renders as `0.99`, not `1.00`. Callers rely on
/// this output; do not change it without treating it as a behavior change.
#[must_use]
pub fn fixed_point_to_text(value: f64, precision: usize) -> FixedText {
    let mut digits = NumText::new();

    if value.is_nan() {
        digits.extend(b"nan");
        return FixedText {
            digits,
            zero_fill: 0,
        };
    }

    let mut magnitude = value;
    if value < 0.0 {
        digits.push(b'-');
        magnitude = -value;
    }

    if magnitude.is_infinite() {
        digits.extend(b"inf");
        return FixedText {
            digits,
            zero_fill: 0,
        };
    }

    let int_part = magnitude.trunc();
    let frac_part = magnitude - int_part;
    push_digits(&mut digits, int_part as u64, Base::DECIMAL);

    if precision == 0 {
        return FixedText {
            digits,
            zero_fill: 0,
        };
    }

    digits.push(b'.');
    let scaled_digits = precision.min(MAX_SCALED_DIGITS);
    let scale = POW10[scaled_digits];
    let mut fraction = (frac_part * scale as f64 + 0.5) as u64;
    if fraction >= scale {
        fraction = scale - 1;
    }

    let fraction_text = unsigned_to_text_u64(fraction, Base::DECIMAL);
    for _ in fraction_text.len()..scaled_digits {
        digits.push(b'0');
    }
    digits.extend(fraction_text.as_bytes());

    FixedText {
        digits,
        zero_fill: precision - scaled_digits,
    }
}

// ---------------------------------------------------------------------------
// Reverse conversion
// ---------------------------------------------------------------------------

/// Parse digits in `base` back into a value.
///
/// Strict: no whitespace, sign or `0x` prefix. Returns `None` on an empty
/// input, a digit outside the base, or overflow.
#[must_use]
pub fn parse_unsigned(text: &[u8], base: Base) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    let radix = u64::from(base.get());
    let cutoff = u64::MAX / radix;
    let cutlim = u64::MAX % radix;

    let mut acc: u64 = 0;
    for &c in text {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'z' => c - b'a' + 10,
            b'A'..=b'Z' => c - b'A' + 10,
            _ => return None,
        };
        let digit = u64::from(digit);
        if digit >= radix {
            return None;
        }
        if acc > cutoff || (acc == cutoff && digit > cutlim) {
            return None;
        }
        acc = acc * radix + digit;
    }
    Some(acc)
}

/// Parse an optionally `-`-prefixed number. Fails outside the `i64` range.
#[must_use]
pub fn parse_signed(text: &[u8], base: Base) -> Option<i64> {
    match text.split_first() {
        Some((b'-', rest)) => {
            let magnitude = parse_unsigned(rest, base)?;
            if magnitude == i64::MIN.unsigned_abs() {
                Some(i64::MIN)
            } else {
                i64::try_from(magnitude).ok().map(|m| -m)
            }
        }
        _ => parse_unsigned(text, base).and_then(|v| i64::try_from(v).ok()),
    }
}
