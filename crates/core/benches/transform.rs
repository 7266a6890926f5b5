use criterion::{Criterion, black_box, criterion_group, criterion_main};
use restyler_core::{Document, classify, extract_styles, normalize, render_markdown, transform};

fn bench_parse(c: &mut Criterion) {
    let source = std::fs::read_to_string("../../tests/fixtures/source.html").unwrap();
    let malformed = std::fs::read_to_string("../../tests/fixtures/malformed.html").unwrap();

    let mut group = c.benchmark_group("parse");
    group.bench_function("source", |b| b.iter(|| Document::parse(black_box(&source))));
    group.bench_function("malformed", |b| b.iter(|| Document::parse(black_box(&malformed))));
    group.finish();
}

fn bench_pipeline_stages(c: &mut Criterion) {
    let source = std::fs::read_to_string("../../tests/fixtures/source.html").unwrap();
    let markdown = std::fs::read_to_string("../../tests/fixtures/target.md").unwrap();
    let text = std::fs::read_to_string("../../tests/fixtures/target.txt").unwrap();

    c.bench_function("classify", |b| b.iter(|| classify(black_box(&markdown))));
    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(&text))));
    c.bench_function("render_markdown", |b| b.iter(|| render_markdown(black_box(&markdown))));
    c.bench_function("extract_styles", |b| b.iter(|| extract_styles(black_box(&source))));
}

fn bench_transform(c: &mut Criterion) {
    let source = std::fs::read_to_string("../../tests/fixtures/source.html").unwrap();
    let markdown = std::fs::read_to_string("../../tests/fixtures/target.md").unwrap();
    let text = std::fs::read_to_string("../../tests/fixtures/target.txt").unwrap();

    let mut group = c.benchmark_group("transform");
    group.bench_function("markdown", |b| b.iter(|| transform(black_box(&source), black_box(&markdown))));
    group.bench_function("plain_text", |b| b.iter(|| transform(black_box(&source), black_box(&text))));
    group.finish();
}

criterion_group!(benches, bench_parse, bench_pipeline_stages, bench_transform);
criterion_main!(benches);
