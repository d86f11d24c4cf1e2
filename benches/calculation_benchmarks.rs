//! Performance benchmarks for the payroll rules engine.
//!
//! This benchmark suite covers the hot paths of a payroll run:
//! - Single annexure evaluation
//! - Old vs new regime comparison
//! - Batch of 1000 annexures plus tax comparison
//! - Leave balance aggregation over a year of requests
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use payroll_engine::calculation::{TaxCalculator, aggregate_balances, evaluate_template};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{DeclarationInput, LeaveRequest, LeaveStatus};

/// Loads the sample company configuration.
fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/sample_company").expect("Failed to load config")
}

/// Creates a typical set of old-regime declarations.
fn create_declarations() -> DeclarationInput {
    DeclarationInput {
        provident_fund: Decimal::from(60_000),
        elss: Decimal::from(100_000),
        medical_insurance_self: Decimal::from(25_000),
        hra_exemption: Decimal::from(120_000),
        ..Default::default()
    }
}

/// Creates one single-day request per working week, alternating status.
fn create_requests(count: usize) -> Vec<LeaveRequest> {
    let start = NaiveDate::from_ymd_opt(2025, 4, 7).expect("valid date");
    let codes = ["CL", "SL", "EL", "LWP"];
    let statuses = [
        LeaveStatus::Approved,
        LeaveStatus::Pending,
        LeaveStatus::Rejected,
        LeaveStatus::Cancelled,
    ];

    (0..count)
        .map(|i| {
            let date = start + Duration::weeks(i as i64);
            LeaveRequest {
                employee_id: "emp_bench_001".to_string(),
                short_code: codes[i % codes.len()].to_string(),
                start_date: date,
                end_date: date,
                is_half_day: false,
                half_day_type: None,
                days: Decimal::ONE,
                status: statuses[i % statuses.len()],
                reason: "Benchmark".to_string(),
            }
        })
        .collect()
}

fn bench_single_annexure(c: &mut Criterion) {
    let loader = load_config();
    let flexi = BTreeSet::new();

    c.bench_function("single_annexure", |b| {
        b.iter(|| {
            let annexure =
                evaluate_template(black_box(Decimal::from(1_000_000)), loader.template(), &flexi);
            black_box(annexure)
        })
    });
}

fn bench_regime_comparison(c: &mut Criterion) {
    let calculator = TaxCalculator::new(load_config().tax_rules().clone());
    let declarations = create_declarations();

    c.bench_function("regime_comparison", |b| {
        b.iter(|| black_box(calculator.compare(black_box(Decimal::from(1_500_000)), &declarations)))
    });
}

fn bench_batch_1000(c: &mut Criterion) {
    let loader = load_config();
    let calculator = TaxCalculator::new(loader.tax_rules().clone());
    let declarations = create_declarations();
    let flexi = BTreeSet::new();

    // CTCs spread from 3 lakh to roughly 53 lakh so every slab row is hit
    let ctcs: Vec<Decimal> = (0..1000)
        .map(|i| Decimal::from(300_000 + i * 5_000))
        .collect();

    let mut group = c.benchmark_group("large_batch_processing");
    group.throughput(Throughput::Elements(1000));
    group.sample_size(10);

    group.bench_function("batch_1000", |b| {
        b.iter(|| {
            let mut results = Vec::with_capacity(ctcs.len());
            for ctc in &ctcs {
                if let Ok(annexure) = evaluate_template(*ctc, loader.template(), &flexi) {
                    results.push(calculator.compare(annexure.taxable_annual(), &declarations));
                }
            }
            black_box(results)
        })
    });

    group.finish();
}

fn bench_leave_aggregation(c: &mut Criterion) {
    let loader = load_config();
    let mut group = c.benchmark_group("leave_aggregation");

    for count in [10, 52, 250] {
        let requests = create_requests(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &requests, |b, requests| {
            b.iter(|| black_box(aggregate_balances(requests, loader.leave_policy())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_annexure,
    bench_regime_comparison,
    bench_batch_1000,
    bench_leave_aggregation,
);

criterion_main!(benches);
