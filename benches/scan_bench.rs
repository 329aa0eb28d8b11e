//! Benchmarks for the header scan pipeline.
//!
//! Run with: `cargo bench`

use std::fmt::{self, Write as _};

use aspect_names::application::ScanUsecase;
use aspect_names::domain::aspect::AspectPolicy;
use aspect_names::domain::lexer::Lexer;
use aspect_names::domain::report::SourceUnit;
use aspect_names::domain::scanner::AspectScanner;
use aspect_names::infrastructure::{DefaultUnitScanner, JsonExporter};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ═══════════════════════════════════════════════════════════════════════════
// Synthetic Header Generators
// ═══════════════════════════════════════════════════════════════════════════

/// A header with `namespaces` nested blocks, each holding one aspect enum of
/// `entries` enumerators plus some unrelated declarations.
fn synthetic_header(namespaces: usize, entries: usize) -> String {
    let mut out = String::from("#include <cstdint>\n\n");
    write_namespaces(&mut out, namespaces, entries).expect("writing to a String cannot fail");
    out
}

fn write_namespaces(out: &mut String, namespaces: usize, entries: usize) -> fmt::Result {
    for ns in 0..namespaces {
        writeln!(out, "namespace module{} {{", ns)?;
        writeln!(out, "/// Unrelated class.\nclass Helper{} {{ int v; }};", ns)?;
        writeln!(out, "enum class Module{}Aspect : std::uint32_t {{", ns)?;
        for e in 0..entries {
            writeln!(out, "    value{}, // entry {}", e, e)?;
        }
        writeln!(out, "    _end\n}};")?;
        writeln!(out, "void helper{}(); /* trailing */\n}} // namespace module{}\n", ns, ns)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Benchmarks
// ═══════════════════════════════════════════════════════════════════════════

fn bench_lexer(c: &mut Criterion) {
    let text = synthetic_header(50, 20);
    let mut group = c.benchmark_group("lexer");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("lex_all", |b| {
        b.iter(|| Lexer::new(black_box(&text)).lex_all())
    });
    group.finish();
}

fn bench_single_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_unit");
    let scanner = AspectScanner::default();

    for namespaces in [10, 100, 500] {
        let unit = SourceUnit::new("bench.h", synthetic_header(namespaces, 16));
        group.throughput(Throughput::Bytes(unit.text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("namespaces", namespaces),
            &unit,
            |b, unit| b.iter(|| scanner.scan(black_box(unit))),
        );
    }
    group.finish();
}

fn bench_parallel_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_batch");
    group.sample_size(30);
    let scanner = DefaultUnitScanner::new(AspectPolicy::default(), None);
    let usecase = ScanUsecase {
        scanner: &scanner,
        exporter: &JsonExporter,
    };

    for units_count in [8, 64, 256] {
        let units: Vec<SourceUnit> = (0..units_count)
            .map(|i| SourceUnit::new(format!("unit{}.h", i), synthetic_header(20, 8)))
            .collect();
        group.throughput(Throughput::Elements(units_count as u64));
        group.bench_with_input(
            BenchmarkId::new("units", units_count),
            &units,
            |b, units| b.iter(|| usecase.scan(black_box(units))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_single_unit, bench_parallel_batch);
criterion_main!(benches);
