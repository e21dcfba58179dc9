use tinyfmt_core::stdlib::{Base, fixed_point_to_text, integer_to_text, parse_unsigned};
use tinyfmt_core::{ArgumentPolicy, FormatArg, FormatConfig, Formatter};

fn render(fmt: &str, args: &[FormatArg<'_>]) -> String {
    let mut out = Vec::new();
    let written = Formatter::new(FormatConfig::default())
        .format(&mut out, fmt.as_bytes(), args)
        .unwrap();
    assert_eq!(written, out.len(), "return value must match bytes delivered");
    String::from_utf8(out).unwrap()
}

#[test]
fn demonstration_lines() {
    let cases: Vec<(&str, Vec<FormatArg<'_>>, &str)> = vec![
        ("String: %s\n", vec!["Hello, World!".into()], "String: Hello, World!\n"),
        ("Character: %c\n", vec![b'A'.into()], "Character: A\n"),
        ("Integer: %d\n", vec![12345.into()], "Integer: 12345\n"),
        ("Negative: %d\n", vec![(-789).into()], "Negative: -789\n"),
        ("Unsigned: %u\n", vec![50000u32.into()], "Unsigned: 50000\n"),
        ("Hex (lowercase): %x\n", vec![255u32.into()], "Hex (lowercase): ff\n"),
        ("Hex (uppercase): %X\n", vec![255u32.into()], "Hex (uppercase): FF\n"),
        ("Float: %f\n", vec![3.14159.into()], "Float: 3.141590\n"),
        ("Percentage sign: %%\n", vec![], "Percentage sign: %\n"),
        ("Width 10: '%10d'\n", vec![123.into()], "Width 10: '       123'\n"),
        ("Precision 2: '%.2f'\n", vec![3.14159.into()], "Precision 2: '3.14'\n"),
        (
            "Width and precision: '%10.2f'\n",
            vec![3.14159.into()],
            "Width and precision: '      3.14'\n",
        ),
        (
            "Multiple arguments: %d, %d, %d, %d\n",
            vec![1.into(), 2.into(), 3.into(), 4.into()],
            "Multiple arguments: 1, 2, 3, 4\n",
        ),
    ];
    for (fmt, args, expected) in cases {
        assert_eq!(render(fmt, &args), expected, "format {fmt:?}");
    }
}

#[test]
fn null_string_renders_placeholder() {
    assert_eq!(render("%s", &[FormatArg::Text(None)]), "(null)");
    assert_eq!(render("%s", &[None::<&str>.into()]), "(null)");
}

#[test]
fn field_length_is_max_of_width_and_natural() {
    for width in 0..12usize {
        for value in [0, 7, -7, 12345, i32::MIN] {
            let fmt = format!("%{width}d");
            let natural = integer_to_text(value, Base::DECIMAL).len();
            let out = render(&fmt, &[value.into()]);
            assert_eq!(out.len(), width.max(natural), "{fmt} with {value}");
            let pad = out.len() - natural;
            assert!(out[..pad].bytes().all(|b| b == b' '));
        }
    }
}

#[test]
fn string_precision_takes_prefix() {
    let text = "formatting";
    for precision in 0..15usize {
        let fmt = format!("%.{precision}s");
        let out = render(&fmt, &[text.into()]);
        assert_eq!(out, &text[..precision.min(text.len())]);
    }
}

#[test]
fn integer_text_round_trips_in_every_base() {
    for radix in 2..=36u32 {
        let base = Base::new(radix).unwrap();
        assert_eq!(integer_to_text(0, base).as_bytes(), b"0");
        for n in [1, 9, 10, 35, 36, 1000, 65535, i32::MAX] {
            let text = integer_to_text(n, base);
            assert_eq!(
                parse_unsigned(text.as_bytes(), base),
                Some(n as u64),
                "{n} in base {radix}"
            );
        }
    }
}

#[test]
fn fixed_point_digit_count() {
    for value in [0.0, 1.5, -2.25, 3.14159, 123456.789, 0.999] {
        for precision in 0..10usize {
            let text = fixed_point_to_text(value, precision).to_vec();
            match text.iter().position(|&b| b == b'.') {
                Some(dot) => assert_eq!(text.len() - dot - 1, precision),
                None => assert_eq!(precision, 0),
            }
        }
    }
}

#[test]
fn policy_changes_mismatch_outcome() {
    let args = [FormatArg::Float(2.0)];
    let mut out = Vec::new();
    let strict = Formatter::new(FormatConfig::new(ArgumentPolicy::Strict));
    assert!(strict.format(&mut out, b"%d", &args).is_err());
    assert!(out.is_empty());

    let hardened = Formatter::new(FormatConfig::new(ArgumentPolicy::Hardened));
    // 2.0f64 has all-zero low 32 bits.
    assert_eq!(hardened.format(&mut out, b"%d", &args).unwrap(), 1);
    assert_eq!(out, b"0");
}
