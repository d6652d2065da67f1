//! Criterion benchmarks for Google Maps rendering.
//!
//! Measures the steady-state cost of a render that updates one feature while
//! the rest stay unchanged, the pattern produced by dragging a vertex. Layer
//! sizes are 100, 1 000 and 5 000 features.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package mapbridge-google
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mapbridge_core::test_support::{MockContainer, point_feature};
use mapbridge_core::{
    AdapterConfig, ChangeSet, Feature, FeatureStyle, MapAdapter, SharedStyleResolver,
};
use mapbridge_google::GoogleMapsAdapter;
use mapbridge_google::test_support::{MockGoogleMap, MockMapsLibrary, london_view};

/// Layer sizes to benchmark.
const LAYER_SIZES: &[u32] = &[100, 1_000, 5_000];

fn features(count: u32) -> Vec<Feature> {
    (0..count)
        .map(|n| point_feature(&format!("f{n}"), -0.2 + f64::from(n) * 1e-5, 51.5))
        .collect()
}

fn bench_incremental_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_render");
    let styles: SharedStyleResolver = Rc::new(|_: &Feature| Some(FeatureStyle::default()));

    for &size in LAYER_SIZES {
        let view = london_view();
        let map = Rc::new(MockGoogleMap::for_view(MockContainer::with_id("map"), view));
        let lib = Rc::new(MockMapsLibrary::with_view(view));
        let Ok(mut adapter) = GoogleMapsAdapter::new(lib, Rc::clone(&map), AdapterConfig::default())
        else {
            panic!("default config should be valid");
        };

        let mut live = features(size);
        adapter.render(&ChangeSet::new().with_created(live.clone()), &styles);
        let moved = live
            .pop()
            .map(|last| point_feature(last.id.as_str(), -0.1, 51.49))
            .unwrap_or_else(|| panic!("layer is never empty"));
        let changes = ChangeSet::new()
            .with_unchanged(live)
            .with_updated(vec![moved]);

        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("features", size), &size, |b, _| {
            b.iter(|| adapter.render(&changes, &styles));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_incremental_render);
criterion_main!(benches);
