use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use inkdrop_core::{
    ExtractConfig, HtmlConfig, Pipeline, RawPage, SmoothieReadability, extract_segments, normalize_title, render_html,
    strip_boilerplate,
};

fn thread_html() -> String {
    std::fs::read_to_string("../../tests/fixtures/thread.html").unwrap()
}

/// A long thread where every paragraph is rendered twice, once wrapped in
/// inline markup, interleaved with engagement chrome.
fn synthetic_fragment(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            let text = format!("Paragraph number {i} of a long thread about reading on paper.");
            format!("<p>{text}</p><p><span>{text}</span></p><p>Reply</p><p>{i}K</p>")
        })
        .collect()
}

fn bench_segments(c: &mut Criterion) {
    let config = ExtractConfig::default();
    let mut group = c.benchmark_group("extract_segments");

    for size in [10, 100, 1000] {
        let fragment = synthetic_fragment(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &fragment, |b, html| {
            b.iter(|| extract_segments(black_box(html), &config))
        });
    }

    group.finish();
}

fn bench_strip(c: &mut Criterion) {
    let html = thread_html();
    c.bench_function("strip_boilerplate", |b| b.iter(|| strip_boilerplate(black_box(&html))));
}

fn bench_title(c: &mut Criterion) {
    c.bench_function("normalize_title", |b| {
        b.iter(|| normalize_title(black_box(r#"(3) Jane Doe on X: "Why slow reading matters" / X"#)))
    });
}

fn bench_render(c: &mut Criterion) {
    let segments = extract_segments(&synthetic_fragment(100), &ExtractConfig::default());
    let config = HtmlConfig::default();
    c.bench_function("render_html", |b| b.iter(|| render_html("Thread", black_box(&segments), &config)));
}

fn bench_full_page(c: &mut Criterion) {
    let html = thread_html();
    let pipeline = Pipeline::offline(SmoothieReadability::default());

    c.bench_function("process_page", |b| {
        b.iter(|| {
            let page = RawPage::from_html(black_box(html.clone())).unwrap();
            pipeline.process_page(page, "https://x.com/jane/status/1")
        })
    });
}

criterion_group!(benches, bench_segments, bench_strip, bench_title, bench_render, bench_full_page);
criterion_main!(benches);
