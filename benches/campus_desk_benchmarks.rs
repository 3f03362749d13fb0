use campus_desk::audit::{AuditAnalyzer, AuditFilter, export};
use campus_desk::core::{ActionType, LogStatus, RiskLevel, SystemLog, SystemLogBuilder};
use chrono::{Duration, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample_logs(count: usize) -> Vec<SystemLog> {
    let now = Utc::now();
    let actions = [
        ActionType::Login,
        ActionType::ViewSensitive,
        ActionType::Update,
        ActionType::Export,
    ];
    (0..count)
        .map(|i| {
            let status = if i % 7 == 0 {
                LogStatus::Failure
            } else {
                LogStatus::Success
            };
            SystemLogBuilder::new(actions[i % actions.len()].clone())
                .actor(format!("user-{}", i % 50), "Staff")
                .ip(format!("10.0.{}.{}", i % 4, i % 200))
                .target(format!("student/{:05}", i % 1000))
                .status(status)
                .risk(RiskLevel::ALL[i % 4])
                .timestamp(now - Duration::minutes(i64::try_from(i).unwrap_or(0) * 3))
                .build()
        })
        .collect()
}

fn bench_analyzer(c: &mut Criterion) {
    let logs = sample_logs(10_000);
    let analyzer = AuditAnalyzer::new(&logs);
    let now = Utc::now();
    let filter = AuditFilter::new().search("user-1").risk(RiskLevel::High);

    c.bench_function("filter_10k", |b| {
        b.iter(|| analyzer.filtered(black_box(&filter)).len());
    });
    c.bench_function("trend_10k", |b| b.iter(|| analyzer.trend(black_box(&now), 7)));
    c.bench_function("kpis_10k", |b| b.iter(|| analyzer.kpis(black_box(&filter))));
    c.bench_function("anomalies_10k", |b| {
        b.iter(|| analyzer.detect_anomalies(black_box(now)));
    });
    c.bench_function("csv_export_10k", |b| b.iter(|| export::to_csv(black_box(&logs))));
}

criterion_group!(benches, bench_analyzer);
criterion_main!(benches);
