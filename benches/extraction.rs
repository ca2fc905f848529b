//! Benchmarks for talkpack extraction and output operations.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench extraction -- html`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use talkpack::core::output::{to_csv, to_json, to_jsonl};
use talkpack::core::{OutputConfig, day_ranges, rename_speaker};
use talkpack::dom::html::HtmlDocument;
use talkpack::dom::snapshot::Snapshot;
use talkpack::transcript::format_at;
use talkpack::{ConversationEvent, ExtractConfig, Extractor, Labels};

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_talk_html(count: usize) -> String {
    let mut items = Vec::with_capacity(count + count / 50);
    for i in 0..count {
        if i % 50 == 0 {
            items.push(format!(
                r#"<li class="inform_date"><span class="date">2024. 1. {}</span></li>"#,
                i / 50 + 1
            ));
        }
        let top = 60 + i * 40;
        if i % 2 == 0 {
            items.push(format!(
                r#"<li class="msg_rgt"><div class="msg_box" data-rect="900,{},300,36"><p class="msg">Message number {}</p><span class="date">09:{:02}</span></div></li>"#,
                top,
                i,
                i % 60
            ));
        } else {
            // Every other reply is a continuation without a header
            let header = if i % 4 == 1 {
                r#"<dt><span class="name">Alex</span></dt>"#
            } else {
                ""
            };
            items.push(format!(
                r#"<li class="msg_lft"><dl>{}<dd><div class="msg_box" data-rect="300,{},420,36"><p class="msg">Message number {}</p><span class="date">09:{:02}</span></div></dd></dl></li>"#,
                header,
                top,
                i,
                i % 60
            ));
        }
    }
    format!(
        r#"<html data-viewport-width="1280"><body><ul class="chat_view" data-rect="260,60,1000,840">{}</ul></body></html>"#,
        items.join("\n")
    )
}

fn generate_talk_snapshot(count: usize) -> String {
    // node 0 body, node 1 container, then item/paragraph pairs
    let mut nodes = vec![
        r#"{"tag": "body", "children": [1]}"#.to_string(),
        String::new(),
    ];
    let mut item_ids = Vec::with_capacity(count);
    for i in 0..count {
        let item = nodes.len();
        item_ids.push(item.to_string());
        let (class, left) = if i % 2 == 0 { ("msg_rgt", 900) } else { ("msg_lft", 300) };
        nodes.push(format!(
            r#"{{"tag": "li", "attrs": {{"class": "{}"}}, "children": [{}]}}"#,
            class,
            item + 1
        ));
        nodes.push(format!(
            r#"{{"tag": "div", "attrs": {{"class": "msg_box"}}, "rect": {{"left": {}, "top": {}, "width": 300, "height": 36}}, "children": ["Message number {}"]}}"#,
            left,
            60 + i * 40,
            i
        ));
    }
    nodes[1] = format!(
        r#"{{"tag": "ul", "attrs": {{"class": "chat_view"}}, "rect": {{"left": 260, "top": 60, "width": 1000, "height": 840}}, "children": [{}]}}"#,
        item_ids.join(", ")
    );
    format!(
        r#"{{"viewport": {{"width": 1280, "height": 900}}, "nodes": [{}]}}"#,
        nodes.join(",\n")
    )
}

fn generate_events(count: usize) -> Vec<ConversationEvent> {
    let mut events = Vec::with_capacity(count + count / 50);
    for i in 0..count {
        if i % 50 == 0 {
            events.push(ConversationEvent::date_marker(format!("2024. 1. {}", i / 50 + 1)));
        }
        let (speaker, is_self) = if i % 2 == 0 { ("Me", true) } else { ("Alex", false) };
        events.push(ConversationEvent::message(
            speaker,
            is_self,
            format!("09:{:02}", i % 60),
            format!("Message number {}", i),
        ));
    }
    events
}

// =============================================================================
// Extraction Benchmarks
// =============================================================================

fn bench_html_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_extraction");
    let extractor = Extractor::new(ExtractConfig::default()).unwrap();

    for size in [100_usize, 1_000, 10_000] {
        let html = generate_talk_html(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &html, |b, html| {
            b.iter(|| {
                let document = HtmlDocument::parse(black_box(html));
                black_box(extractor.extract_document(&document))
            });
        });
    }
    group.finish();
}

fn bench_snapshot_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_extraction");
    let extractor = Extractor::new(ExtractConfig::default()).unwrap();

    for size in [100_usize, 1_000, 10_000] {
        let json = generate_talk_snapshot(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let snapshot = Snapshot::from_json(black_box(json)).unwrap();
                black_box(extractor.extract_document(&snapshot))
            });
        });
    }
    group.finish();
}

fn bench_geometric_locator(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometric_locator");
    // No container rule matches, so every pass scans the page
    let mut markers = talkpack::Markers::default();
    markers.locators.clear();
    let extractor = Extractor::new(ExtractConfig::new().with_markers(markers)).unwrap();

    for size in [100_usize, 1_000] {
        let document = HtmlDocument::parse(&generate_talk_html(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &document, |b, document| {
            b.iter(|| black_box(extractor.extract_document(black_box(document))));
        });
    }
    group.finish();
}

// =============================================================================
// Processing Benchmarks
// =============================================================================

fn bench_rename_and_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("rename_and_days");

    for size in [1_000_usize, 10_000, 100_000] {
        let events = generate_events(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| {
                let mut events = black_box(events.clone());
                rename_speaker(&mut events, "Alex", "Alex Kim");
                black_box(day_ranges(&events))
            });
        });
    }
    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_output_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_text");
    let labels = Labels::default();
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    for size in [100_usize, 1_000, 10_000] {
        let events = generate_events(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| black_box(format_at(black_box(events), &labels, at)));
        });
    }
    group.finish();
}

fn bench_output_structured(c: &mut Criterion) {
    let mut group = c.benchmark_group("output_structured");
    let config = OutputConfig::default();
    let events = generate_events(10_000);
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("csv", |b| {
        b.iter(|| black_box(to_csv(black_box(&events), &config).unwrap()));
    });
    group.bench_function("json", |b| {
        b.iter(|| black_box(to_json(black_box(&events), &config).unwrap()));
    });
    group.bench_function("jsonl", |b| {
        b.iter(|| black_box(to_jsonl(black_box(&events), &config).unwrap()));
    });
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_html_extraction,
    bench_snapshot_extraction,
    bench_geometric_locator,
    bench_rename_and_days,
    bench_output_text,
    bench_output_structured,
);

criterion_main!(benches);
