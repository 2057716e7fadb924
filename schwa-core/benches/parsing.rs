//! Benchmark for parsing and diffing performance.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use schwa_core::parser::{java, lexer};
use schwa_core::{diff, SourceUnit};

/// A class with `methods` small methods and some string/comment noise.
fn generate_class(name: &str, methods: usize, variant: usize) -> String {
    let mut source = format!("package bench;\n\npublic class {name} {{\n    private int count;\n\n");
    for i in 0..methods {
        source.push_str(&format!(
            r#"    // method {i} {{
    public int method{i}(int value) throws Exception {{
        String label = "{{{i}}}";
        if (value > {i}) {{
            count += value * {variant};
        }}
        return count;
    }}

"#
        ));
    }
    source.push_str("}\n");
    source
}

fn bench_mask(c: &mut Criterion) {
    let source = generate_class("Masked", 200, 1);

    c.bench_function("mask_200_methods", |b| {
        b.iter(|| black_box(lexer::mask(black_box(&source))))
    });
}

fn bench_parse_java(c: &mut Criterion) {
    let source = generate_class("Parsed", 200, 1);

    c.bench_function("parse_java_200_methods", |b| {
        b.iter(|| black_box(java::parse(black_box(&source))))
    });
}

fn bench_diff_java(c: &mut Criterion) {
    let base = SourceUnit::new("Diffed.java", generate_class("Diffed", 200, 1));
    let head = SourceUnit::new("Diffed.java", generate_class("Diffed", 200, 2));

    c.bench_function("diff_java_200_modified_methods", |b| {
        b.iter(|| black_box(diff(black_box(&base), black_box(&head))))
    });
}

criterion_group!(benches, bench_mask, bench_parse_java, bench_diff_java);
criterion_main!(benches);
