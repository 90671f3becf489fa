use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fatigue_analysis::{FatigueAnalysisEngine, FatigueEvent};

const KINDS: [&str; 5] = ["yawn", "eye-closure", "head-nod", "blink", "distraction"];

fn events(n: usize) -> Vec<FatigueEvent> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (0..n)
        .map(|i| {
            FatigueEvent::new(start + Duration::minutes(i as i64 * 97), (i % 45) as u64)
                .with_kind(KINDS[i % KINDS.len()])
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let engine = FatigueAnalysisEngine::default();
    let small = events(50);
    let large = events(5_000);

    c.bench_function("analyze_50_events", |b| b.iter(|| engine.analyze(black_box(&small))));
    c.bench_function("analyze_5000_events", |b| b.iter(|| engine.analyze(black_box(&large))));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
