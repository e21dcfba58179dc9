//! The demonstration program: a fixed tour of every conversion.

use tinyfmt_core::{FormatArg, FormatError, Formatter, Sink, global_printf};

/// One `printf` call of the demonstration.
#[derive(Debug, Clone)]
pub struct DemoLine {
    pub format: &'static str,
    pub args: Vec<FormatArg<'static>>,
}

impl DemoLine {
    fn new(format: &'static str, args: Vec<FormatArg<'static>>) -> Self {
        Self { format, args }
    }
}

/// The demonstration calls, in order. `%p` receives the address of this
/// function.
#[must_use]
pub fn demo_lines() -> Vec<DemoLine> {
    use FormatArg::{Char, Float, Int, Unsigned};

    let entry_point = demo_lines as fn() -> Vec<DemoLine> as usize;
    vec![
        DemoLine::new("========== CUSTOM PRINTF DEMONSTRATION ==========\n\n", vec![]),
        DemoLine::new("Basic formatting:\n", vec![]),
        DemoLine::new("String: %s\n", vec![FormatArg::from("Hello, World!")]),
        DemoLine::new("Character: %c\n", vec![Char(b'A')]),
        DemoLine::new("Integer: %d\n", vec![Int(12345)]),
        DemoLine::new("Negative: %d\n", vec![Int(-789)]),
        DemoLine::new("Unsigned: %u\n", vec![Unsigned(50000)]),
        DemoLine::new("Hex (lowercase): %x\n", vec![Unsigned(255)]),
        DemoLine::new("Hex (uppercase): %X\n", vec![Unsigned(255)]),
        DemoLine::new("Pointer: %p\n", vec![FormatArg::Pointer(entry_point)]),
        DemoLine::new("Float: %f\n", vec![Float(3.14159)]),
        DemoLine::new("Percentage sign: %%\n", vec![]),
        DemoLine::new("\nWidth and precision:\n", vec![]),
        DemoLine::new("Width 10: '%10d'\n", vec![Int(123)]),
        DemoLine::new("Precision 2: '%.2f'\n", vec![Float(3.14159)]),
        DemoLine::new("Width and precision: '%10.2f'\n", vec![Float(3.14159)]),
        DemoLine::new("\nMixed formatting:\n", vec![]),
        DemoLine::new(
            "Mixed: %d %s %c\n",
            vec![Int(42), FormatArg::from("is the answer"), Char(b'!')],
        ),
        DemoLine::new(
            "Multiple arguments: %d, %d, %d, %d\n",
            vec![Int(1), Int(2), Int(3), Int(4)],
        ),
        DemoLine::new("\n===================================================\n", vec![]),
    ]
}

/// Run the demonstration through `formatter`, one call per line.
pub fn render_demo<S: Sink + ?Sized>(
    formatter: &Formatter,
    sink: &mut S,
) -> Result<usize, FormatError> {
    let mut total = 0;
    for line in demo_lines() {
        total += formatter.format(sink, line.format.as_bytes(), &line.args)?;
    }
    Ok(total)
}

/// Run the demonstration through the process-wide formatter.
pub fn render_demo_global() -> Result<usize, FormatError> {
    let mut total = 0;
    for line in demo_lines() {
        total += global_printf(line.format.as_bytes(), &line.args)?;
    }
    Ok(total)
}
