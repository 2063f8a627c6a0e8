//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite tracks the hot paths of a payroll close:
//! - Statutory configuration resolution
//! - Per-item statutory calculations (PF, ESI, PT)
//! - Full run calculation across growing workforces
//! - Compliance apply over a calculated run
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use payroll_engine::calculation::{calculate_esi, calculate_pf, calculate_pt};
use payroll_engine::config::{
    ConfigSet, EsiConfig, PfConfig, PtConfig, PtSlab, StatutoryConfig, StatutoryPayload,
    StatutoryType,
};
use payroll_engine::engine::{AttendanceSummary, InMemoryAttendance, PayrollEngine};
use payroll_engine::models::{
    ComponentCode, EmployeePayProfile, PayComponent, PayPolicy, PayRunItem, PayType,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pf_payload() -> StatutoryPayload {
    StatutoryPayload::Pf(PfConfig {
        base_tag: "BASIC".to_string(),
        wage_cap: Some(dec("15000")),
        emp_rate: dec("0.12"),
        er_eps_rate: dec("0.0833"),
        er_epf_rate: dec("0.0367"),
    })
}

fn esi_payload() -> StatutoryPayload {
    StatutoryPayload::Esi(EsiConfig {
        threshold: Some(dec("21000")),
        emp_rate: dec("0.0075"),
        er_rate: dec("0.0325"),
    })
}

fn pt_payload(state: &str) -> StatutoryPayload {
    StatutoryPayload::Pt(PtConfig {
        state: state.to_string(),
        slabs: vec![
            PtSlab {
                min: dec("0"),
                max: Some(dec("7500")),
                amount: dec("0"),
            },
            PtSlab {
                min: dec("7501"),
                max: Some(dec("10000")),
                amount: dec("175"),
            },
            PtSlab {
                min: dec("10001"),
                max: None,
                amount: dec("200"),
            },
        ],
    })
}

/// Builds a configuration set with rows spread across scopes and states so
/// resolution has realistic filtering work to do.
fn large_config_set(rows_per_type: u64) -> ConfigSet {
    let mut configs = Vec::new();
    let mut id = 0u64;
    for i in 0..rows_per_type {
        let state = ["KA", "MH", "TN", "DL"][(i % 4) as usize];
        for payload in [pf_payload(), esi_payload(), pt_payload(state)] {
            id += 1;
            configs.push(StatutoryConfig {
                id,
                company_id: None,
                state: Some(state.to_string()),
                priority: (i % 3) as i32,
                effective_from: date(2020 + (i % 5) as i32, 4, 1),
                effective_to: None,
                payload,
            });
        }
    }
    ConfigSet::new(configs)
}

fn bench_item(gross: &str) -> PayRunItem {
    let gross = dec(gross);
    PayRunItem {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        days_worked: dec("26"),
        lop_days: Decimal::ZERO,
        ot_hours: Decimal::ZERO,
        gross,
        deductions: Decimal::ZERO,
        net: gross,
        components: vec![PayComponent::new(ComponentCode::Basic, gross)],
        remarks: None,
        audit: vec![],
    }
}

/// Seeds an engine with one policy and `employees` monthly profiles.
fn seeded_engine(employees: usize) -> (PayrollEngine, Uuid) {
    let configs = ConfigSet::new(vec![
        StatutoryConfig {
            id: 1,
            company_id: None,
            state: None,
            priority: 0,
            effective_from: date(2023, 4, 1),
            effective_to: None,
            payload: pf_payload(),
        },
        StatutoryConfig {
            id: 2,
            company_id: None,
            state: None,
            priority: 0,
            effective_from: date(2023, 4, 1),
            effective_to: None,
            payload: esi_payload(),
        },
        StatutoryConfig {
            id: 3,
            company_id: None,
            state: None,
            priority: 0,
            effective_from: date(2023, 4, 1),
            effective_to: None,
            payload: pt_payload("KA"),
        },
    ]);

    let attendance = Arc::new(InMemoryAttendance::new());
    let engine = PayrollEngine::new(configs, attendance.clone());
    let company_id = Uuid::new_v4();
    engine
        .store()
        .insert_policy(PayPolicy {
            company_id,
            paid_day_kinds: vec!["worked".to_string()],
            monthly_paid_leave: dec("1.5"),
            default_ot_multiplier: dec("2"),
            minimum_wage_check: false,
            effective_from: date(2023, 4, 1),
            effective_to: None,
        })
        .unwrap();

    for i in 0..employees {
        let employee_id = Uuid::new_v4();
        engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::MonthlyFixed {
                    base_monthly: dec("15000") + Decimal::from(i as u32 * 100),
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("26"),
                ..Default::default()
            },
        );
    }

    (engine, company_id)
}

fn bench_config_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_resolution");
    for rows in [10u64, 100, 1000] {
        let set = large_config_set(rows);
        let company_id = Uuid::new_v4();
        group.throughput(Throughput::Elements(rows));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &set, |b, set| {
            b.iter(|| {
                black_box(set.resolve_active(
                    black_box(StatutoryType::Pf),
                    company_id,
                    "KA",
                    date(2024, 4, 30),
                ))
            })
        });
    }
    group.finish();
}

fn bench_statutory_calculators(c: &mut Criterion) {
    let item = bench_item("18000");
    let StatutoryPayload::Pf(pf) = pf_payload() else {
        unreachable!()
    };
    let StatutoryPayload::Esi(esi) = esi_payload() else {
        unreachable!()
    };
    let StatutoryPayload::Pt(pt) = pt_payload("KA") else {
        unreachable!()
    };

    c.bench_function("calculate_pf", |b| {
        b.iter(|| black_box(calculate_pf(black_box(&item), &pf)))
    });
    c.bench_function("calculate_esi", |b| {
        b.iter(|| black_box(calculate_esi(black_box(&item), &esi)))
    });
    c.bench_function("calculate_pt", |b| {
        b.iter(|| black_box(calculate_pt(black_box(&item), &pt, "KA")))
    });
}

fn bench_run_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_calculation");
    for employees in [10usize, 100, 1000] {
        let (engine, company_id) = seeded_engine(employees);
        let run = engine
            .create_run(company_id, date(2024, 4, 1), date(2024, 4, 30))
            .unwrap();
        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(employees),
            &run.id,
            |b, run_id| b.iter(|| black_box(engine.calculate(*run_id).unwrap())),
        );
    }
    group.finish();
}

fn bench_api_preview(c: &mut Criterion) {
    use axum::{body::Body, http::Request};
    use payroll_engine::api::{AppState, create_router};
    use tower::ServiceExt;

    let rt = tokio::runtime::Runtime::new().unwrap();
    let (engine, company_id) = seeded_engine(100);
    let run = engine
        .create_run(company_id, date(2024, 4, 1), date(2024, 4, 30))
        .unwrap();
    engine.calculate(run.id).unwrap();
    let state = AppState::new(engine);
    let uri = format!("/runs/{}/compliance/preview?state=KA", run.id);

    c.bench_function("api_compliance_preview_100", |b| {
        b.to_async(&rt).iter(|| async {
            let response = create_router(state.clone())
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(&uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response.status())
        })
    });
}

fn bench_compliance_apply(c: &mut Criterion) {
    let (engine, company_id) = seeded_engine(100);
    let run = engine
        .create_run(company_id, date(2024, 4, 1), date(2024, 4, 30))
        .unwrap();
    engine.calculate(run.id).unwrap();

    c.bench_function("compliance_apply_100", |b| {
        b.iter(|| black_box(engine.apply_compliance(run.id, "KA").unwrap()))
    });
}

criterion_group!(
    benches,
    bench_config_resolution,
    bench_statutory_calculators,
    bench_run_calculation,
    bench_api_preview,
    bench_compliance_apply
);
criterion_main!(benches);
