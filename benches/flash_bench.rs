use altre_flash::flash::{LabelAllocator, LabelContext, MarkerStore};
use altre_flash::search::{LiteralMatcher, StringMatcher, VisibleText};
use altre_flash::FlashConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_window() -> VisibleText {
    let line = "let value = buffer.get(index).copied().unwrap_or_default();\n";
    VisibleText::new(0, 0, &line.repeat(60))
}

fn benchmark_scan(c: &mut Criterion) {
    let visible = sample_window();
    let matcher = LiteralMatcher::new();

    c.bench_function("flash_scan_visible_window", |b| {
        b.iter(|| matcher.find_matches(black_box(&visible), black_box("va"), false, 1000));
    });
}

fn benchmark_scan_and_label(c: &mut Criterion) {
    let visible = sample_window();
    let matcher = LiteralMatcher::new();
    let config = FlashConfig {
        hierarchical_labels: true,
        ..FlashConfig::default()
    };
    let store = MarkerStore::new(LabelAllocator::from_config(&config));

    c.bench_function("flash_scan_and_label", |b| {
        b.iter(|| {
            let ctx = LabelContext {
                visible_text: &visible,
                cursor: black_box(1800),
                first_character: Some('e'),
                case_sensitive: false,
            };
            let matches = matcher.find_matches(&visible, "e", false, 1000);
            let set = store.create(matches, &ctx);
            store.narrow(&set, 't', &ctx)
        });
    });
}

criterion_group!(benches, benchmark_scan, benchmark_scan_and_label);
criterion_main!(benches);
