//! Pay run calculation orchestration.
//!
//! Calculation turns attendance and pay-profile data into run line items.
//! It is a full rebuild: every prior item is deleted and replaced in the
//! same critical section, which makes recalculation idempotent and ensures
//! statutory lines applied by a previous compliance pass can never be
//! double-counted.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{daily_wage_gross, monthly_gross};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComponentCode, EmployeePayProfile, PayComponent, PayPolicy, PayRun, PayRunItem, PayType,
    RunStatus,
};

use super::PayrollEngine;
use super::gateway::AttendanceSummary;
use super::lifecycle::ensure_status;

const HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

impl PayrollEngine {
    /// Calculates (or recalculates) a run.
    ///
    /// Allowed from `draft` or `calculated`. Resolves the pay policy as of
    /// the period end (falling back to the period start), fetches the
    /// attendance rollup, computes one item per effective pay profile, then
    /// atomically replaces the run's items, stamps `calculated_at` and
    /// stores the totals snapshot. Data-integrity failures (no policy, no
    /// profiles, unresolvable trade rate, gateway failure) abort before the
    /// rebuild begins, leaving prior items untouched.
    pub fn calculate(&self, run_id: Uuid) -> EngineResult<PayRun> {
        let allowed = [RunStatus::Draft, RunStatus::Calculated];

        let run = self.get_run(run_id)?;
        ensure_status(&run, "calculate", &allowed)?;

        let policy = self.resolve_policy(&run)?;
        let rollup = self
            .attendance
            .rollup(run.company_id, run.period_start, run.period_end)?;
        let profiles = self.store().profiles_effective_on(run.period_end)?;
        if profiles.is_empty() {
            warn!(run_id = %run_id, "No employees to calculate");
            return Err(EngineError::NoEmployees {
                company_id: run.company_id,
                date: run.period_end,
            });
        }

        let mut items = Vec::with_capacity(profiles.len());
        for profile in &profiles {
            let attendance = rollup
                .get(&profile.employee_id)
                .cloned()
                .unwrap_or_default();
            items.push(self.build_item(&run, &policy, profile, &attendance)?);
        }

        // Re-check the status inside the critical section: only one
        // concurrent calculate may win, and the wipe-and-rebuild is atomic.
        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "calculate", &allowed)?;

        run.items = items;
        run.status = RunStatus::Calculated;
        run.calculated_at = Some(Utc::now());
        run.snapshot_totals();

        let totals = run.totals.clone();
        info!(
            run_id = %run_id,
            employees = run.items.len(),
            gross = %totals.as_ref().map(|t| t.gross).unwrap_or_default(),
            "Calculated pay run"
        );
        Ok(run.clone())
    }

    fn resolve_policy(&self, run: &PayRun) -> EngineResult<PayPolicy> {
        if let Some(policy) = self
            .store()
            .policy_effective_on(run.company_id, run.period_end)?
        {
            return Ok(policy);
        }
        if let Some(policy) = self
            .store()
            .policy_effective_on(run.company_id, run.period_start)?
        {
            return Ok(policy);
        }
        Err(EngineError::NoPayPolicy {
            company_id: run.company_id,
            date: run.period_end,
        })
    }

    fn build_item(
        &self,
        run: &PayRun,
        policy: &PayPolicy,
        profile: &EmployeePayProfile,
        attendance: &AttendanceSummary,
    ) -> EngineResult<PayRunItem> {
        let (base, overtime) = match &profile.pay_type {
            PayType::MonthlyFixed { base_monthly } => {
                // Fixed 30-day LOP divisor, no overtime term for monthly pay.
                let base = monthly_gross(*base_monthly, attendance.lop_days);
                (base, Decimal::ZERO)
            }
            PayType::DailyWage {
                trade_code,
                per_day_override,
                ot_override,
            } => {
                let trade = self
                    .store()
                    .trade_effective_on(trade_code, run.period_end)?;
                let per_day = per_day_override
                    .or(trade.as_ref().map(|t| t.per_day_rate))
                    .ok_or_else(|| EngineError::TradeRateNotFound {
                        code: trade_code.clone(),
                        date: run.period_end,
                    })?;
                let ot_rate = ot_override
                    .or(trade.as_ref().and_then(|t| t.ot_hourly_rate))
                    .unwrap_or_else(|| {
                        per_day / HOURS_PER_DAY * policy.default_ot_multiplier
                    });

                let split = daily_wage_gross(
                    per_day,
                    ot_rate,
                    attendance.days_worked,
                    attendance.ot_hours,
                );
                let mut base = split.base;
                if profile.incentive_percent > Decimal::ZERO {
                    base *= Decimal::ONE + profile.incentive_percent / HUNDRED;
                }
                (base, split.overtime)
            }
        };

        let gross = base + overtime;
        let mut components = vec![PayComponent::new(ComponentCode::Basic, base)];
        if overtime != Decimal::ZERO {
            components.push(PayComponent::new(ComponentCode::Ot, overtime));
        }

        Ok(PayRunItem {
            id: Uuid::new_v4(),
            employee_id: profile.employee_id,
            days_worked: attendance.days_worked,
            lop_days: attendance.lop_days,
            ot_hours: attendance.ot_hours,
            gross,
            deductions: Decimal::ZERO,
            net: gross,
            components,
            remarks: None,
            audit: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSet;
    use crate::engine::{InMemoryAttendance, PayrollEngine};
    use crate::models::TradeCategory;
    use chrono::NaiveDate;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        engine: PayrollEngine,
        attendance: Arc<InMemoryAttendance>,
        company_id: Uuid,
    }

    fn fixture() -> Fixture {
        let attendance = Arc::new(InMemoryAttendance::new());
        let engine = PayrollEngine::new(ConfigSet::default(), attendance.clone());
        let company_id = Uuid::new_v4();
        engine
            .store()
            .insert_policy(PayPolicy {
                company_id,
                paid_day_kinds: vec!["worked".to_string(), "holiday".to_string()],
                monthly_paid_leave: dec("1.5"),
                default_ot_multiplier: dec("2"),
                minimum_wage_check: false,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        Fixture {
            engine,
            attendance,
            company_id,
        }
    }

    fn monthly_employee(fixture: &Fixture, base: &str) -> Uuid {
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::MonthlyFixed {
                    base_monthly: dec(base),
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        employee_id
    }

    fn april_run(fixture: &Fixture) -> Uuid {
        fixture
            .engine
            .create_run(fixture.company_id, date(2024, 4, 1), date(2024, 4, 30))
            .unwrap()
            .id
    }

    #[test]
    fn test_monthly_fixed_with_lop() {
        let fixture = fixture();
        let employee_id = monthly_employee(&fixture, "30000");
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("25"),
                lop_days: dec("3"),
                ..Default::default()
            },
        );

        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        assert_eq!(run.status, RunStatus::Calculated);
        assert!(run.calculated_at.is_some());

        let item = &run.items[0];
        assert_eq!(item.gross, dec("27000"));
        assert_eq!(item.net, dec("27000"));
        assert_eq!(item.component_amount(&ComponentCode::Basic), dec("27000"));
        assert!(item.component(&ComponentCode::Ot).is_none());

        let totals = run.totals.unwrap();
        assert_eq!(totals.employee_count, 1);
        assert_eq!(totals.gross, dec("27000"));
    }

    #[test]
    fn test_employee_missing_from_rollup_defaults_to_zero() {
        let fixture = fixture();
        monthly_employee(&fixture, "30000");

        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        let item = &run.items[0];
        assert_eq!(item.days_worked, Decimal::ZERO);
        assert_eq!(item.lop_days, Decimal::ZERO);
        // Monthly pay with zero LOP is the full base.
        assert_eq!(item.gross, dec("30000"));
    }

    #[test]
    fn test_daily_wage_with_trade_rates_and_overtime() {
        let fixture = fixture();
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_trade(TradeCategory {
                code: "MASON".to_string(),
                per_day_rate: dec("800"),
                ot_hourly_rate: Some(dec("150")),
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::DailyWage {
                    trade_code: "MASON".to_string(),
                    per_day_override: None,
                    ot_override: None,
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("22"),
                ot_hours: dec("10"),
                ..Default::default()
            },
        );

        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        let item = &run.items[0];
        assert_eq!(item.gross, dec("19100"));
        assert_eq!(item.component_amount(&ComponentCode::Basic), dec("17600"));
        assert_eq!(item.component_amount(&ComponentCode::Ot), dec("1500"));
    }

    #[test]
    fn test_profile_override_beats_trade_rate() {
        let fixture = fixture();
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_trade(TradeCategory {
                code: "MASON".to_string(),
                per_day_rate: dec("800"),
                ot_hourly_rate: Some(dec("150")),
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::DailyWage {
                    trade_code: "MASON".to_string(),
                    per_day_override: Some(dec("900")),
                    ot_override: None,
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("20"),
                ..Default::default()
            },
        );

        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        assert_eq!(run.items[0].gross, dec("18000"));
    }

    #[test]
    fn test_ot_fallback_uses_policy_multiplier() {
        let fixture = fixture();
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_trade(TradeCategory {
                code: "HELPER".to_string(),
                per_day_rate: dec("400"),
                ot_hourly_rate: None,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::DailyWage {
                    trade_code: "HELPER".to_string(),
                    per_day_override: None,
                    ot_override: None,
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("10"),
                ot_hours: dec("4"),
                ..Default::default()
            },
        );

        // 400/8 * 2 = 100 per OT hour; 4000 base + 400 OT.
        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        assert_eq!(run.items[0].gross, dec("4400"));
    }

    #[test]
    fn test_missing_trade_rate_aborts_whole_calculation() {
        let fixture = fixture();
        monthly_employee(&fixture, "30000");
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::DailyWage {
                    trade_code: "UNKNOWN".to_string(),
                    per_day_override: None,
                    ot_override: None,
                },
                incentive_percent: Decimal::ZERO,
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();

        let run_id = april_run(&fixture);
        assert!(matches!(
            fixture.engine.calculate(run_id),
            Err(EngineError::TradeRateNotFound { .. })
        ));
        // No partial rebuild: the run still has no items and stays draft.
        let run = fixture.engine.get_run(run_id).unwrap();
        assert!(run.items.is_empty());
        assert_eq!(run.status, RunStatus::Draft);
    }

    #[test]
    fn test_no_profiles_fails_with_no_employees() {
        let fixture = fixture();
        let run_id = april_run(&fixture);
        assert!(matches!(
            fixture.engine.calculate(run_id),
            Err(EngineError::NoEmployees { .. })
        ));
    }

    #[test]
    fn test_no_policy_fails_before_items_are_touched() {
        let attendance = Arc::new(InMemoryAttendance::new());
        let engine = PayrollEngine::new(ConfigSet::default(), attendance);
        let run = engine
            .create_run(Uuid::new_v4(), date(2024, 4, 1), date(2024, 4, 30))
            .unwrap();
        assert!(matches!(
            engine.calculate(run.id),
            Err(EngineError::NoPayPolicy { .. })
        ));
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let fixture = fixture();
        let employee_id = monthly_employee(&fixture, "30000");
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("26"),
                lop_days: dec("2"),
                ..Default::default()
            },
        );

        let run_id = april_run(&fixture);
        let first = fixture.engine.calculate(run_id).unwrap();
        let second = fixture.engine.calculate(run_id).unwrap();

        assert_eq!(first.items.len(), second.items.len());
        for (a, b) in first.items.iter().zip(second.items.iter()) {
            assert_eq!(a.employee_id, b.employee_id);
            assert_eq!(a.gross, b.gross);
            assert_eq!(a.net, b.net);
            assert_eq!(a.components, b.components);
        }
        assert_eq!(first.totals, second.totals);
    }

    #[test]
    fn test_calculate_rejected_once_approved() {
        let fixture = fixture();
        let employee_id = monthly_employee(&fixture, "30000");
        fixture.attendance.set(employee_id, AttendanceSummary::default());

        let run_id = april_run(&fixture);
        fixture.engine.calculate(run_id).unwrap();
        fixture.engine.approve_run(run_id).unwrap();

        match fixture.engine.calculate(run_id) {
            Err(EngineError::StateConflict { current, .. }) => {
                assert_eq!(current, RunStatus::Approved);
            }
            other => panic!("Expected StateConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_incentive_uplifts_daily_wage_base() {
        let fixture = fixture();
        let employee_id = Uuid::new_v4();
        fixture
            .engine
            .store()
            .insert_profile(EmployeePayProfile {
                id: Uuid::new_v4(),
                employee_id,
                pay_type: PayType::DailyWage {
                    trade_code: "MASON".to_string(),
                    per_day_override: Some(dec("1000")),
                    ot_override: None,
                },
                incentive_percent: dec("10"),
                effective_from: date(2023, 4, 1),
                effective_to: None,
            })
            .unwrap();
        fixture.attendance.set(
            employee_id,
            AttendanceSummary {
                days_worked: dec("10"),
                ..Default::default()
            },
        );

        let run = fixture.engine.calculate(april_run(&fixture)).unwrap();
        assert_eq!(run.items[0].gross, dec("11000.0"));
    }
}
