use criterion::{black_box, criterion_group, criterion_main, Criterion};

use moneyflow_core::cashback::{clamp_fixed, clamp_percent, compute_cap, resolve_cycle_tag};
use chrono::NaiveDate;

fn bench_compute_cap(c: &mut Criterion) {
    c.bench_function("compute_cap", |b| {
        b.iter(|| {
            compute_cap(
                black_box(1_000_000),
                black_box(5.0),
                black_box(500_000),
                black_box(480_000),
            )
        })
    });
}

fn bench_clamp_pair(c: &mut Criterion) {
    c.bench_function("clamp_percent_then_fixed", |b| {
        b.iter(|| {
            let cap = compute_cap(1_000_000, 5.0, 500_000, black_box(480_000));
            let percent = clamp_percent(black_box(5.0), 10_000, 1_000_000, cap.effective_cap);
            clamp_fixed(black_box(50_000), percent, 1_000_000, cap.effective_cap)
        })
    });
}

fn bench_resolve_cycle_tag(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
    c.bench_function("resolve_cycle_tag", |b| {
        b.iter(|| resolve_cycle_tag(black_box(date), black_box(11)))
    });
}

criterion_group!(
    benches,
    bench_compute_cap,
    bench_clamp_pair,
    bench_resolve_cycle_tag
);
criterion_main!(benches);
