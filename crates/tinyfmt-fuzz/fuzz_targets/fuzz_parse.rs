#![no_main]
use libfuzzer_sys::fuzz_target;
use tinyfmt_core::stdio::spec::{FormatSegment, parse_format_string};
use tinyfmt_core::stdlib::{Base, parse_signed, parse_unsigned, unsigned_to_text_u64};

fuzz_target!(|data: &[u8]| {
    // Literal segments are verbatim slices of the input, in order.
    let mut literal_bytes = 0;
    for segment in parse_format_string(data) {
        if let FormatSegment::Literal(text) = segment {
            assert!(!text.is_empty());
            literal_bytes += text.len();
        }
    }
    assert!(literal_bytes <= data.len());

    // Digits that parse must print back identically (modulo leading zeros).
    for base in [Base::BINARY, Base::OCTAL, Base::DECIMAL, Base::HEX] {
        if let Some(v) = parse_unsigned(data, base) {
            let text = unsigned_to_text_u64(v, base);
            let again = parse_unsigned(text.as_bytes(), base);
            assert_eq!(again, Some(v));
        }
        let _ = parse_signed(data, base);
    }
});
