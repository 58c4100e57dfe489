//! Locator resolver benchmarks
//!
//! Measures resolution cost over snapshots of increasing size, for locators
//! that hit the highest-priority criterion, the lowest, and nothing at all.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyword_web::locator::{ElementSnapshot, LocatorResolver};

fn snapshot(len: usize) -> Vec<ElementSnapshot> {
    (0..len)
        .map(|index| ElementSnapshot {
            index,
            tag: "input".to_string(),
            id: Some(format!("box-{}", index)),
            classes: vec![format!("group-{}", index % 7)],
            name: Some(format!("name-{}", index)),
            value: Some("on".to_string()),
            text: Some(format!("Option {}", index)),
            alt: None,
            label_for: None,
            checked: Some(false),
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = LocatorResolver::default();
    let mut group = c.benchmark_group("resolve");

    for len in [10usize, 100, 1000] {
        let elements = snapshot(len);
        let last_id = format!("box-{}", len - 1);

        group.bench_with_input(BenchmarkId::new("id_hit_last", len), &elements, |b, els| {
            b.iter(|| resolver.resolve(black_box(&last_id), els).unwrap())
        });

        group.bench_with_input(
            BenchmarkId::new("index_fallback", len),
            &elements,
            |b, els| {
                // Numeric locator that matches no attribute: every criterion
                // scans before the index fallback fires.
                let locator = (len - 1).to_string();
                b.iter(|| resolver.resolve(black_box(&locator), els).unwrap())
            },
        );

        group.bench_with_input(BenchmarkId::new("not_found", len), &elements, |b, els| {
            b.iter(|| resolver.resolve(black_box("missing-locator"), els).is_err())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
