use criterion::{Criterion, criterion_group, criterion_main};
use resell_dashboard::api::{ChartBinding, DashboardConfig};
use resell_dashboard::core::{MetricDeriver, Row, nice_range};
use resell_dashboard::render::NullRenderer;
use std::hint::black_box;

fn sample_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let base = 5.0 + (i % 37) as f64;
            Row::new(
                format!("item-{i}"),
                base,
                base * 1.4,
                (i % 23) as f64,
                (i % 61) as f64,
            )
        })
        .collect()
}

fn bench_nice_range(c: &mut Criterion) {
    c.bench_function("nice_range_mixed_magnitudes", |b| {
        b.iter(|| {
            for data_max in [0.0, 7.5, 45.0, 734.0, 12_345.6, 9_876_543.0] {
                let _ = nice_range(black_box(data_max));
            }
        })
    });
}

fn bench_derive_1k(c: &mut Criterion) {
    let rows = sample_rows(1_000);
    let deriver = MetricDeriver::default();

    c.bench_function("derive_metrics_1k", |b| {
        b.iter(|| {
            let _ = deriver
                .derive(black_box(rows.clone()))
                .expect("derive should succeed");
        })
    });
}

fn bench_rebind_1k(c: &mut Criterion) {
    let rows = MetricDeriver::default()
        .derive(sample_rows(1_000))
        .expect("derive should succeed");
    let mut binding = ChartBinding::new(NullRenderer::default(), DashboardConfig::default())
        .expect("binding init");

    c.bench_function("rebind_1k", |b| {
        b.iter(|| {
            let _ = binding
                .rebind(black_box(&rows))
                .expect("rebind should succeed");
        })
    });
}

criterion_group!(benches, bench_nice_range, bench_derive_1k, bench_rebind_1k);
criterion_main!(benches);
