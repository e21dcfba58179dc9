//! Formatting benchmarks.
//!
//! Usage:
//! - `cargo bench -p tinyfmt-bench --bench printf_bench`
//!
//! Covers the Rust entry points under both argument policies and the C ABI
//! `tinyfmt_snprintf` path with its argument decoding.

use std::ffi::c_char;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tinyfmt_abi::TinyfmtArg;
use tinyfmt_abi::printf_abi::tinyfmt_snprintf;
use tinyfmt_core::{ArgumentPolicy, FormatArg, FormatConfig, Formatter};

const MIXED: &[u8] = b"Mixed: %d %s %c | %10.2f | %x | %p\n";

fn mixed_args() -> [FormatArg<'static>; 6] {
    [
        FormatArg::Int(42),
        FormatArg::from("is the answer"),
        FormatArg::Char(b'!'),
        FormatArg::Float(3.14159),
        FormatArg::Unsigned(0xBEEF),
        FormatArg::Pointer(0x7fff_0000),
    ]
}

fn bench_policies(c: &mut Criterion) {
    let args = mixed_args();
    let mut group = c.benchmark_group("format_mixed");
    for policy in [ArgumentPolicy::Strict, ArgumentPolicy::Hardened] {
        let formatter = Formatter::new(FormatConfig::new(policy));
        let mut out = Vec::with_capacity(256);
        group.bench_function(policy.as_str(), |b| {
            b.iter(|| {
                out.clear();
                black_box(formatter.format(&mut out, black_box(MIXED), &args))
            });
        });
    }
    group.finish();
}

fn bench_literal_throughput(c: &mut Criterion) {
    let formatter = Formatter::new(FormatConfig::default());
    let mut group = c.benchmark_group("format_literal");
    for len in [64_usize, 1024, 16 * 1024] {
        let fmt = vec![b'x'; len];
        let mut out = Vec::with_capacity(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &fmt, |b, fmt| {
            b.iter(|| {
                out.clear();
                black_box(formatter.format(&mut out, fmt, &[]))
            });
        });
    }
    group.finish();
}

fn bench_buffer_capacity(c: &mut Criterion) {
    let args = mixed_args();
    let fmt = MIXED.repeat(32);
    let full_args: Vec<FormatArg<'_>> = args.iter().copied().cycle().take(6 * 32).collect();
    let mut group = c.benchmark_group("format_capacity");
    for capacity in [64_usize, 512, 4096] {
        let formatter = Formatter::new(FormatConfig::default().with_capacity(capacity));
        let mut out = Vec::with_capacity(4096);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &fmt, |b, fmt| {
            b.iter(|| {
                out.clear();
                black_box(formatter.format(&mut out, fmt, &full_args))
            });
        });
    }
    group.finish();
}

fn bench_snprintf_abi(c: &mut Criterion) {
    let fmt = b"value=%d name=%s pi=%.3f\0";
    let name = b"tinyfmt\0";
    let args = [
        TinyfmtArg::int(12345),
        TinyfmtArg::text(name.as_ptr().cast::<c_char>()),
        TinyfmtArg::float(3.14159),
    ];
    let mut buf = [0_u8; 128];
    c.bench_function("tinyfmt_snprintf", |b| {
        b.iter(|| {
            // SAFETY: every pointer references a live, NUL-terminated buffer.
            let n = unsafe {
                tinyfmt_snprintf(
                    buf.as_mut_ptr().cast::<c_char>(),
                    buf.len(),
                    fmt.as_ptr().cast::<c_char>(),
                    args.as_ptr(),
                    args.len(),
                )
            };
            black_box(n)
        });
    });
}

criterion_group!(
    benches,
    bench_policies,
    bench_literal_throughput,
    bench_buffer_capacity,
    bench_snprintf_abi
);
criterion_main!(benches);
