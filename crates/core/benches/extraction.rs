use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use chatscribe_core::{ChatExtractor, Document, detect_tags, strip_platform_artifacts};

const FIXTURES: &[&str] = &["chatgpt_export", "gemini_export"];

fn load(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}.html", name)).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for name in FIXTURES {
        let html = load(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), &html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }

    group.finish();
}

fn bench_strip(c: &mut Criterion) {
    let html = load("chatgpt_export");

    c.bench_function("strip_platform_artifacts", |b| {
        b.iter(|| {
            let mut doc = Document::parse(black_box(&html));
            strip_platform_artifacts(&mut doc)
        })
    });
}

fn bench_extract_response(c: &mut Criterion) {
    let html = load("chatgpt_export");
    let extractor = ChatExtractor::new();

    c.bench_function("extract_response", |b| {
        b.iter(|| extractor.extract_response_html(black_box(&html), black_box("ownership work in Rust")))
    });
}

fn bench_full_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_page");
    let extractor = ChatExtractor::new();

    for name in FIXTURES {
        let html = load(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), &html, |b, html| {
            b.iter(|| extractor.extract_full_page_html(black_box(html)))
        });
    }

    group.finish();
}

fn bench_tags(c: &mut Criterion) {
    let markdown = ChatExtractor::new()
        .extract_full_page_html(&load("chatgpt_export"))
        .markdown
        .unwrap_or_default();

    c.bench_function("detect_tags", |b| b.iter(|| detect_tags(black_box(&markdown))));
}

criterion_group!(
    benches,
    bench_parse,
    bench_strip,
    bench_extract_response,
    bench_full_page,
    bench_tags
);
criterion_main!(benches);
