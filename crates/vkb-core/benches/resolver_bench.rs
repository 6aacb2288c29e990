//! Criterion benchmarks for the layout-set resolver.
//!
//! Separates the cold path (definition transforms plus natural layout) from
//! the resize path, which only rescales memoized natural geometry.
//!
//! Run with:
//! ```bash
//! cargo bench --package vkb-core --bench resolver_bench
//! ```

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vkb_core::domain::request::{BottomActionKey, NumberRowMode};
use vkb_core::{
    BundledResources, ComputedSize, LayoutDefinitionStore, LayoutElement, LayoutRequest,
    LayoutSetResolver, Locale,
};

fn store() -> Arc<LayoutDefinitionStore> {
    Arc::new(LayoutDefinitionStore::from_provider(&BundledResources).expect("bundled data must load"))
}

fn request(height: i32) -> LayoutRequest {
    let locale = Locale::parse("en-US").expect("valid tag");
    LayoutRequest::new("qwerty", locale, ComputedSize::regular(1080, height))
        .with_number_row(true, NumberRowMode::Default)
        .with_arrow_row(true)
        .with_bottom_action_key(Some(BottomActionKey::Emoji))
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// New resolver for every iteration: nothing is memoized.
fn bench_cold_resolve(c: &mut Criterion) {
    let store = store();
    let request = request(600);

    c.bench_function("resolve_cold_alphabet", |b| {
        b.iter(|| {
            let resolver = LayoutSetResolver::new(Arc::clone(&store), black_box(&request))
                .expect("resolver must build");
            resolver.get_keyboard(LayoutElement::ALPHABET).expect("alphabet")
        })
    });
}

/// Natural geometry is memoized; each iteration only rescales.
fn bench_resize(c: &mut Criterion) {
    let resolver = LayoutSetResolver::new(store(), &request(600)).expect("resolver must build");
    resolver.get_keyboard(LayoutElement::ALPHABET).expect("warm up");
    let mut group = c.benchmark_group("resolve_resize");

    for &height in &[67, 600, 4440] {
        group.bench_with_input(BenchmarkId::new("height", height), &height, |b, &height| {
            b.iter(|| {
                let resized = resolver
                    .with_computed_size(ComputedSize::regular(1080, black_box(height)))
                    .expect("valid size");
                resized.get_keyboard(LayoutElement::ALPHABET).expect("alphabet")
            })
        });
    }

    group.finish();
}

fn bench_memoized(c: &mut Criterion) {
    let resolver = LayoutSetResolver::new(store(), &request(600)).expect("resolver must build");
    resolver.get_keyboard(LayoutElement::ALPHABET).expect("warm up");

    c.bench_function("resolve_memoized_alphabet", |b| {
        b.iter(|| resolver.get_keyboard(black_box(LayoutElement::ALPHABET)))
    });
}

criterion_group!(benches, bench_cold_resolve, bench_resize, bench_memoized);
criterion_main!(benches);
