//! C layout of tagged arguments and their decoding into [`FormatArg`].

use std::ffi::{CStr, c_char, c_int, c_uint, c_void};

use tinyfmt_core::FormatArg;

pub const TINYFMT_INT: u32 = 0;
pub const TINYFMT_UNSIGNED: u32 = 1;
pub const TINYFMT_CHAR: u32 = 2;
pub const TINYFMT_TEXT: u32 = 3;
pub const TINYFMT_FLOAT: u32 = 4;
pub const TINYFMT_POINTER: u32 = 5;

#[repr(C)]
#[derive(Clone, Copy)]
pub union TinyfmtValue {
    pub i: c_int,
    pub u: c_uint,
    pub c: u8,
    /// NUL-terminated text, or null.
    pub s: *const c_char,
    pub f: f64,
    pub p: *const c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct TinyfmtArg {
    pub tag: u32,
    pub value: TinyfmtValue,
}

impl TinyfmtArg {
    #[must_use]
    pub const fn int(v: c_int) -> Self {
        Self {
            tag: TINYFMT_INT,
            value: TinyfmtValue { i: v },
        }
    }

    #[must_use]
    pub const fn unsigned(v: c_uint) -> Self {
        Self {
            tag: TINYFMT_UNSIGNED,
            value: TinyfmtValue { u: v },
        }
    }

    #[must_use]
    pub const fn char(v: u8) -> Self {
        Self {
            tag: TINYFMT_CHAR,
            value: TinyfmtValue { c: v },
        }
    }

    #[must_use]
    pub const fn text(v: *const c_char) -> Self {
        Self {
            tag: TINYFMT_TEXT,
            value: TinyfmtValue { s: v },
        }
    }

    #[must_use]
    pub const fn float(v: f64) -> Self {
        Self {
            tag: TINYFMT_FLOAT,
            value: TinyfmtValue { f: v },
        }
    }

    #[must_use]
    pub const fn pointer(v: *const c_void) -> Self {
        Self {
            tag: TINYFMT_POINTER,
            value: TinyfmtValue { p: v },
        }
    }
}

/// Decode `nargs` entries. Returns the offending tag on an unknown one.
///
/// # Safety
///
/// `args` must be valid for `nargs` reads (it may be null when `nargs` is 0)
/// and every text pointer must be null or NUL-terminated and outlive `'a`.
pub unsafe fn decode_args<'a>(
    args: *const TinyfmtArg,
    nargs: usize,
) -> Result<Vec<FormatArg<'a>>, u32> {
    if nargs == 0 {
        return Ok(Vec::new());
    }
    if args.is_null() {
        return Err(u32::MAX);
    }
    let raw = unsafe { std::slice::from_raw_parts(args, nargs) };
    raw.iter()
        .map(|arg| unsafe { decode_one(arg) })
        .collect()
}

unsafe fn decode_one<'a>(arg: &TinyfmtArg) -> Result<FormatArg<'a>, u32> {
    let value = &arg.value;
    Ok(match arg.tag {
        TINYFMT_INT => FormatArg::Int(unsafe { value.i }),
        TINYFMT_UNSIGNED => FormatArg::Unsigned(unsafe { value.u }),
        TINYFMT_CHAR => FormatArg::Char(unsafe { value.c }),
        TINYFMT_TEXT => {
            let ptr = unsafe { value.s };
            if ptr.is_null() {
                FormatArg::Text(None)
            } else {
                FormatArg::Text(Some(unsafe { CStr::from_ptr(ptr) }.to_bytes()))
            }
        }
        TINYFMT_FLOAT => FormatArg::Float(unsafe { value.f }),
        TINYFMT_POINTER => FormatArg::Pointer(unsafe { value.p } as usize),
        other => return Err(other),
    })
}
