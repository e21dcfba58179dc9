//! Typed argument list and the sequential cursor that consumes it.
//!
//! Each directive that needs a value pulls exactly one [`FormatArg`]. What
//! happens when the value is missing or of the wrong kind depends on the
//! [`ArgumentPolicy`]:
//!
//! - strict: the fetch fails with [`FormatError::MissingArgument`] or
//!   [`FormatError::ArgumentMismatch`];
//! - hardened: the value is reinterpreted (integers by truncating casts,
//!   floats by their low 32 bits, non-text as a null string, missing as
//!   zero) and the repair is counted.
//!
//! `Int` and `Unsigned` are interchangeable for every integer conversion, and
//! `%c` also takes an `Int`, matching the C rules for same-width signed and
//! unsigned arguments and for promoted `char`. Those are not repairs.

use core::fmt;

use crate::config::ArgumentPolicy;
use crate::error::FormatError;
use crate::metrics::{FormatMetrics, global_metrics};
use crate::stdio::spec::Conversion;

// ---------------------------------------------------------------------------
// Argument values
// ---------------------------------------------------------------------------

/// One formatting argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    Int(i32),
    Unsigned(u32),
    Char(u8),
    /// `None` is a null string and renders as `(null)`.
    Text(Option<&'a [u8]>),
    Float(f64),
    Pointer(usize),
}

/// Variant tag of a [`FormatArg`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Int,
    Unsigned,
    Char,
    Text,
    Float,
    Pointer,
}

impl ArgKind {
    /// The kind a conversion expects, or `None` if it takes no argument.
    #[must_use]
    pub const fn for_conversion(conversion: Conversion) -> Option<Self> {
        match conversion {
            Conversion::Signed => Some(Self::Int),
            Conversion::Unsigned | Conversion::HexLower | Conversion::HexUpper => {
                Some(Self::Unsigned)
            }
            Conversion::Char => Some(Self::Char),
            Conversion::Str => Some(Self::Text),
            Conversion::Fixed => Some(Self::Float),
            Conversion::Pointer => Some(Self::Pointer),
            Conversion::Percent | Conversion::Unknown(_) => None,
        }
    }

    /// Whether a `found` argument satisfies a fetch of `self` without repair.
    #[must_use]
    pub const fn accepts(self, found: ArgKind) -> bool {
        match (self, found) {
            (Self::Int | Self::Unsigned, Self::Int | Self::Unsigned) => true,
            (Self::Char, Self::Char | Self::Int) => true,
            (Self::Text, Self::Text)
            | (Self::Float, Self::Float)
            | (Self::Pointer, Self::Pointer) => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Unsigned => "unsigned",
            Self::Char => "char",
            Self::Text => "text",
            Self::Float => "float",
            Self::Pointer => "pointer",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> FormatArg<'a> {
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Int(_) => ArgKind::Int,
            Self::Unsigned(_) => ArgKind::Unsigned,
            Self::Char(_) => ArgKind::Char,
            Self::Text(_) => ArgKind::Text,
            Self::Float(_) => ArgKind::Float,
            Self::Pointer(_) => ArgKind::Pointer,
        }
    }

    /// Bit pattern used when an integer-family fetch reinterprets this value.
    /// Text reinterprets as its address; floats contribute their low 32 bits.
    fn raw_bits(&self) -> u64 {
        match *self {
            Self::Int(v) => i64::from(v) as u64,
            Self::Unsigned(v) => u64::from(v),
            Self::Char(v) => u64::from(v),
            Self::Pointer(v) => v as u64,
            Self::Float(v) => v.to_bits() & 0xFFFF_FFFF,
            Self::Text(Some(s)) => s.as_ptr() as usize as u64,
            Self::Text(None) => 0,
        }
    }

    fn as_float(&self) -> f64 {
        match *self {
            Self::Float(v) => v,
            Self::Int(v) => f64::from(v),
            Self::Unsigned(v) => f64::from(v),
            Self::Char(v) => f64::from(v),
            Self::Pointer(v) => v as f64,
            Self::Text(_) => 0.0,
        }
    }
}

impl From<i32> for FormatArg<'_> {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FormatArg<'_> {
    fn from(v: u32) -> Self {
        Self::Unsigned(v)
    }
}

impl From<u8> for FormatArg<'_> {
    fn from(v: u8) -> Self {
        Self::Char(v)
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(Some(v.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(v: &'a [u8]) -> Self {
        Self::Text(Some(v))
    }
}

impl<'a> From<Option<&'a str>> for FormatArg<'a> {
    fn from(v: Option<&'a str>) -> Self {
        Self::Text(v.map(str::as_bytes))
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(v: *const T) -> Self {
        Self::Pointer(v as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(v: *mut T) -> Self {
        Self::Pointer(v as usize)
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Sequential reader over an argument slice.
///
/// Every fetch advances the position by one, whether or not an argument was
/// there. Arguments left over at the end are ignored.
#[derive(Debug, Clone)]
pub struct ArgumentCursor<'a> {
    args: &'a [FormatArg<'a>],
    index: usize,
    policy: ArgumentPolicy,
    repairs: usize,
}

impl<'a> ArgumentCursor<'a> {
    /// A strict cursor.
    #[must_use]
    pub fn new(args: &'a [FormatArg<'a>]) -> Self {
        Self::with_policy(args, ArgumentPolicy::Strict)
    }

    #[must_use]
    pub fn with_policy(args: &'a [FormatArg<'a>], policy: ArgumentPolicy) -> Self {
        Self {
            args,
            index: 0,
            policy,
            repairs: 0,
        }
    }

    /// Number of fetches so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.args.len().saturating_sub(self.index)
    }

    /// Repairs applied by this cursor (always 0 when strict).
    #[must_use]
    pub const fn repairs(&self) -> usize {
        self.repairs
    }

    pub fn next_int(&mut self, conversion: u8) -> Result<i32, FormatError> {
        Ok(match self.take(conversion, ArgKind::Int)? {
            Some(FormatArg::Int(v)) => v,
            Some(other) => other.raw_bits() as i32,
            None => 0,
        })
    }

    pub fn next_unsigned(&mut self, conversion: u8) -> Result<u32, FormatError> {
        Ok(match self.take(conversion, ArgKind::Unsigned)? {
            Some(FormatArg::Unsigned(v)) => v,
            Some(other) => other.raw_bits() as u32,
            None => 0,
        })
    }

    pub fn next_char(&mut self, conversion: u8) -> Result<u8, FormatError> {
        Ok(match self.take(conversion, ArgKind::Char)? {
            Some(FormatArg::Char(v)) => v,
            Some(other) => other.raw_bits() as u8,
            None => 0,
        })
    }

    /// `Ok(None)` is a null string.
    pub fn next_text(&mut self, conversion: u8) -> Result<Option<&'a [u8]>, FormatError> {
        Ok(match self.take(conversion, ArgKind::Text)? {
            Some(FormatArg::Text(v)) => v,
            _ => None,
        })
    }

    pub fn next_float(&mut self, conversion: u8) -> Result<f64, FormatError> {
        Ok(self
            .take(conversion, ArgKind::Float)?
            .map_or(0.0, |arg| arg.as_float()))
    }

    pub fn next_pointer(&mut self, conversion: u8) -> Result<usize, FormatError> {
        Ok(match self.take(conversion, ArgKind::Pointer)? {
            Some(FormatArg::Pointer(v)) => v,
            Some(other) => other.raw_bits() as usize,
            None => 0,
        })
    }

    /// Consume one argument for `conversion` without converting it.
    ///
    /// Conversions that take no argument are a no-op.
    pub fn skip(&mut self, conversion: u8) -> Result<(), FormatError> {
        match ArgKind::for_conversion(Conversion::from_byte(conversion)) {
            Some(kind) => self.take(conversion, kind).map(|_| ()),
            None => Ok(()),
        }
    }

    fn take(
        &mut self,
        conversion: u8,
        expected: ArgKind,
    ) -> Result<Option<FormatArg<'a>>, FormatError> {
        let index = self.index;
        self.index = self.index.saturating_add(1);

        match self.args.get(index).copied() {
            Some(arg) if expected.accepts(arg.kind()) => Ok(Some(arg)),
            Some(arg) => {
                if self.policy.repairs_enabled() {
                    self.note_repair();
                    Ok(Some(arg))
                } else {
                    Err(FormatError::ArgumentMismatch {
                        index,
                        conversion: char::from(conversion),
                        expected,
                        found: arg.kind(),
                    })
                }
            }
            None => {
                if self.policy.repairs_enabled() {
                    self.note_repair();
                    Ok(None)
                } else {
                    Err(FormatError::MissingArgument {
                        index,
                        conversion: char::from(conversion),
                    })
                }
            }
        }
    }

    fn note_repair(&mut self) {
        self.repairs += 1;
        FormatMetrics::inc(&global_metrics().argument_repairs);
    }
}
