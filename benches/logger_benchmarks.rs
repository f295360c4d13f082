//! Criterion benchmarks for zlog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io;
use std::sync::Arc;
use std::thread;
use zlog::core::escape::append_escaped;
use zlog::prelude::*;

fn null_logger(level: Level) -> Logger {
    Logger::builder()
        .level(level)
        .writer(IoWriter::new(io::sink()))
        .build()
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(Level::Trace);

    group.bench_function("message_only", |b| {
        b.iter(|| {
            logger.info().msg(black_box("Info message"));
        });
    });

    group.bench_function("five_fields", |b| {
        b.iter(|| {
            logger
                .info()
                .str("user", black_box("ann"))
                .int("attempt", black_box(3))
                .bool("admin", black_box(false))
                .float64("score", black_box(0.75))
                .dur("elapsed", black_box(std::time::Duration::from_micros(1500)))
                .msg("login");
        });
    });

    group.bench_function("msgf", |b| {
        b.iter(|| {
            logger.info().msgf(format_args!("request {} took {}ms", black_box(7), 12));
        });
    });

    let ctx = Entry::new_context().str("svc", "api").int("shard", 4).value();
    let child = logger.with_context(&ctx);
    group.bench_function("with_context", |b| {
        b.iter(|| {
            child.info().str("k", "v").msg("ctx");
        });
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(Level::Warn);

    group.bench_function("filtered_out", |b| {
        b.iter(|| {
            logger
                .debug()
                .str("user", black_box("ann"))
                .int("n", 1)
                .msg(black_box("dropped"));
        });
    });

    group.bench_function("passed_through", |b| {
        b.iter(|| {
            logger.error().msg(black_box("kept"));
        });
    });

    group.finish();
}

// ============================================================================
// Escape Benchmarks
// ============================================================================

fn bench_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape");

    let clean = "The quick brown fox jumps over the lazy dog 0123456789".repeat(4);
    let dirty = "line one\n\"quoted\" <tag> it's\ttabbed\\".repeat(4);
    let mut out = Vec::with_capacity(1024);

    group.throughput(Throughput::Bytes(clean.len() as u64));
    group.bench_function("fast_path", |b| {
        b.iter(|| {
            out.clear();
            append_escaped(&mut out, black_box(clean.as_bytes()));
        });
    });

    group.throughput(Throughput::Bytes(dirty.len() as u64));
    group.bench_function("slow_path", |b| {
        b.iter(|| {
            out.clear();
            append_escaped(&mut out, black_box(dirty.as_bytes()));
        });
    });

    group.finish();
}

// ============================================================================
// Reformatting Benchmarks
// ============================================================================

fn bench_reformat(c: &mut Criterion) {
    let mut group = c.benchmark_group("reformat");
    group.throughput(Throughput::Elements(1));

    let record = br#"{"time":"2024-01-02T03:04:05.123Z","level":"info","goid":3,"caller":"src/main.rs:42","user":"ann","n":2,"ok":true,"o":{"a":[1,2]},"message":"login"}
"#;

    group.bench_function("parse_args", |b| {
        b.iter(|| black_box(FormatterArgs::parse(black_box(record))));
    });

    let console = ConsoleWriter::new()
        .color_output(true)
        .writer(io::sink());
    group.bench_function("console", |b| {
        b.iter(|| console.write_record(black_box(record)));
    });

    let logfmt = ConsoleWriter::new()
        .formatter(LogfmtFormatter::new().into_formatter())
        .writer(io::sink());
    group.bench_function("logfmt", |b| {
        b.iter(|| logfmt.write_record(black_box(record)));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            let logger = Arc::new(null_logger(Level::Info));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..100 {
                                logger.info().uint("thread", t).int("i", i).msg("tick");
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encoding,
    bench_level_filtering,
    bench_escape,
    bench_reformat,
    bench_concurrent_logging,
);

criterion_main!(benches);
