use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_blocks::{BlockInstance, Column};
use pagecraft_resolver::{ContentRecord, SiteMap, TagResolver};

fn page(sections: usize) -> Vec<BlockInstance> {
    (0..sections)
        .map(|i| {
            BlockInstance::new(format!("s{}", i), "section").with_section(vec![
                BlockInstance::new(format!("h{}", i), "heading").with_setting("text", "@dynamic:post_title"),
                BlockInstance::new(format!("r{}", i), "row").with_columns(vec![
                    Column::new(vec![BlockInstance::new(format!("a{}", i), "text")
                        .with_setting("text", "@dynamic:post_excerpt")]),
                    Column::new(vec![BlockInstance::new(format!("b{}", i), "text")
                        .with_setting("text", "@dynamic:site_name")
                        .with_setting("color", "#333")]),
                ]),
            ])
        })
        .collect()
}

fn resolve_small_page(c: &mut Criterion) {
    let resolver = TagResolver::new(SiteMap::from([("site_name".to_string(), "Acme".to_string())]));
    let content = ContentRecord {
        title: "Hello".into(),
        content: "<p>Body text for the benchmark post.</p>".into(),
        ..ContentRecord::default()
    };
    let blocks = page(5);

    c.bench_function("resolve_small_page", |b| {
        b.iter(|| {
            let mut blocks = blocks.clone();
            resolver.resolve_blocks(black_box(&mut blocks), Some(&content), None)
        })
    });
}

fn resolve_large_page(c: &mut Criterion) {
    let resolver = TagResolver::new(SiteMap::new());
    let content = ContentRecord::default();
    let blocks = page(200);

    c.bench_function("resolve_large_page", |b| {
        b.iter(|| {
            let mut blocks = blocks.clone();
            resolver.resolve_blocks(black_box(&mut blocks), Some(&content), None)
        })
    });
}

fn resolve_inline_text(c: &mut Criterion) {
    let resolver = TagResolver::new(SiteMap::from([("site_name".to_string(), "Acme".to_string())]));
    let text = "Welcome to {{ site_name }} - © {{current_year}} {{site_name}}";

    c.bench_function("resolve_inline_text", |b| {
        b.iter(|| resolver.resolve_text(black_box(text), None, None))
    });
}

criterion_group!(benches, resolve_small_page, resolve_large_page, resolve_inline_text);
criterion_main!(benches);
