//! Benchmarks for compilation and rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use slenderize_core::{compile, render, Bindings, StaticRegistry};

/// A page-shaped document: `sections` sections of mixed lines.
fn document(sections: usize) -> String {
    let mut out = String::from("html\n\thead\n\t\ttitle|Benchmark\n\tbody\n");
    for i in 0..sections {
        out.push_str(&format!("\t\tsection id=\"s{i}\" class='block'\n"));
        out.push_str("\t\t\th|Heading\n");
        out.push_str("\t\t\tp|Some literal text that runs on for a while.\n");
        out.push_str("\t\t\tul\n\t\t\t\tli|one\n\t\t\t\tli|two\n");
        out.push_str("\t\t\t{{$title}}\n");
        out.push_str("\t\t\ta href=\"/next\" {{$attrs}}\n");
    }
    out
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for sections in [1, 50, 500] {
        let source = document(sections);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(format!("sections_{sections}"), |b| {
            b.iter(|| compile(black_box(source.as_bytes())).map(|out| out.len()))
        });
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let output = compile(document(500).as_bytes()).unwrap();
    c.bench_function("compose/sections_500", |b| b.iter(|| black_box(&output).compose()));
}

fn bench_render(c: &mut Criterion) {
    let composed = compile(document(500).as_bytes()).unwrap().compose();
    let bindings = Bindings::new().with_value("title", "Title").with_value("attrs", "data-x=\"1\"");
    let statics = StaticRegistry::new();

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Bytes(composed.len() as u64));
    group.bench_function("sections_500", |b| {
        b.iter(|| render(black_box(&composed), &bindings, &statics))
    });
    group.finish();
}

criterion_group!(benches, bench_compile, bench_compose, bench_render);
criterion_main!(benches);
