#![no_main]
use libfuzzer_sys::fuzz_target;
use tinyfmt_core::{ArgumentPolicy, FormatArg, FormatConfig, Formatter};

fuzz_target!(|data: &[u8]| {
    // First byte picks the buffer size; the rest is the format string.
    let Some((&size_byte, fmt)) = data.split_first() else {
        return;
    };
    let capacity = 64 + usize::from(size_byte) * 16;
    // Keep field widths and precisions small enough to render.
    if fmt.windows(5).any(|w| w.iter().all(u8::is_ascii_digit)) {
        return;
    }

    let args = [
        FormatArg::Int(i32::MIN),
        FormatArg::from("fuzz"),
        FormatArg::Text(None),
        FormatArg::Float(-1.0e300),
        FormatArg::Unsigned(u32::MAX),
        FormatArg::Char(b'Z'),
        FormatArg::Pointer(usize::MAX),
        FormatArg::Float(f64::NAN),
    ];

    // Hardened repairs every argument problem, so the call must succeed.
    let formatter = Formatter::new(
        FormatConfig::new(ArgumentPolicy::Hardened).with_capacity(capacity),
    );
    let mut out = Vec::new();
    let n = formatter
        .format(&mut out, fmt, &args)
        .expect("hardened formatting into a Vec cannot fail");
    assert_eq!(n, out.len());

    // Strict either produces the same bytes or nothing at all.
    let strict = Formatter::new(FormatConfig::new(ArgumentPolicy::Strict));
    let mut strict_out = Vec::new();
    match strict.format(&mut strict_out, fmt, &args) {
        Ok(_) => assert_eq!(strict_out, out),
        Err(err) => {
            assert!(err.is_argument_error());
            assert!(strict_out.is_empty());
        }
    }
});
