//! Effective-dated pay profiles, trade categories, policies and cycles.
//!
//! Each of these records is valid over `[effective_from, effective_to]` with
//! an absent `effective_to` meaning open-ended. Exactly one pay profile must
//! be effective per employee per date; the store rejects overlapping windows
//! on insert.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an employee is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pay_type", rename_all = "snake_case")]
pub enum PayType {
    /// A fixed monthly amount, prorated for loss-of-pay days.
    MonthlyFixed {
        /// The monthly base amount.
        base_monthly: Decimal,
    },
    /// Paid per day worked at a trade-category rate.
    DailyWage {
        /// The trade category supplying default rates.
        trade_code: String,
        /// Per-day rate override; takes precedence over the trade category.
        #[serde(default)]
        per_day_override: Option<Decimal>,
        /// Hourly overtime rate override.
        #[serde(default)]
        ot_override: Option<Decimal>,
    },
}

/// An employee's effective-dated pay profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayProfile {
    /// Unique identifier for this profile row.
    pub id: Uuid,
    /// The employee the profile belongs to.
    pub employee_id: Uuid,
    /// How the employee is paid.
    #[serde(flatten)]
    pub pay_type: PayType,
    /// Incentive percentage applied as a gross uplift for daily-wage pay.
    #[serde(default)]
    pub incentive_percent: Decimal,
    /// First date the profile is effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the profile is effective (inclusive); open-ended if absent.
    pub effective_to: Option<NaiveDate>,
}

impl EmployeePayProfile {
    /// Returns true if the profile window contains `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }

    /// Returns true if this profile's window overlaps `other`'s window.
    pub fn overlaps(&self, other: &EmployeePayProfile) -> bool {
        let self_to = self.effective_to.unwrap_or(NaiveDate::MAX);
        let other_to = other.effective_to.unwrap_or(NaiveDate::MAX);
        self.effective_from <= other_to && other.effective_from <= self_to
    }
}

/// An effective-dated per-day and overtime rate row for a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCategory {
    /// The trade code (e.g. `MASON`, `HELPER`).
    pub code: String,
    /// Rate paid per day worked.
    pub per_day_rate: Decimal,
    /// Hourly overtime rate; falls back to the pay policy multiplier if absent.
    #[serde(default)]
    pub ot_hourly_rate: Option<Decimal>,
    /// First date the rates are effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the rates are effective (inclusive); open-ended if absent.
    pub effective_to: Option<NaiveDate>,
}

impl TradeCategory {
    /// Returns true if the rate window contains `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}

/// A company-scoped, effective-dated pay policy.
///
/// Exactly one policy must be resolvable per company per date: the latest
/// `effective_from` on or before the date, with an absent `effective_to`
/// meaning open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPolicy {
    /// The company the policy belongs to.
    pub company_id: Uuid,
    /// Day kinds that count as paid (e.g. `worked`, `holiday`, `weekly_off`).
    pub paid_day_kinds: Vec<String>,
    /// Fixed monthly paid-leave allowance in days.
    pub monthly_paid_leave: Decimal,
    /// Default overtime multiplier applied to a derived hourly rate when no
    /// explicit overtime rate exists.
    pub default_ot_multiplier: Decimal,
    /// Whether daily-wage rates should be checked against minimum wage.
    pub minimum_wage_check: bool,
    /// First date the policy is effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the policy is effective (inclusive); open-ended if absent.
    pub effective_to: Option<NaiveDate>,
}

impl PayPolicy {
    /// Returns true if the policy window contains `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}

/// A company-scoped pay calendar definition; read-only input to run creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayCycle {
    /// The company the cycle belongs to.
    pub company_id: Uuid,
    /// Day of month the period anchors on (1-based).
    pub anchor_day: u8,
    /// Free-form payday rule (e.g. `last_working_day`).
    pub payday_rule: String,
    /// IANA timezone name for the calendar.
    pub timezone: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_profile(from: NaiveDate, to: Option<NaiveDate>) -> EmployeePayProfile {
        EmployeePayProfile {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            pay_type: PayType::MonthlyFixed {
                base_monthly: dec("30000"),
            },
            incentive_percent: Decimal::ZERO,
            effective_from: from,
            effective_to: to,
        }
    }

    #[test]
    fn test_open_ended_profile_is_effective_forever() {
        let profile = monthly_profile(date(2024, 1, 1), None);
        assert!(profile.is_effective_on(date(2024, 1, 1)));
        assert!(profile.is_effective_on(date(2030, 12, 31)));
        assert!(!profile.is_effective_on(date(2023, 12, 31)));
    }

    #[test]
    fn test_closed_profile_includes_both_endpoints() {
        let profile = monthly_profile(date(2024, 1, 1), Some(date(2024, 6, 30)));
        assert!(profile.is_effective_on(date(2024, 1, 1)));
        assert!(profile.is_effective_on(date(2024, 6, 30)));
        assert!(!profile.is_effective_on(date(2024, 7, 1)));
    }

    #[test]
    fn test_overlap_detection() {
        let first = monthly_profile(date(2024, 1, 1), Some(date(2024, 6, 30)));
        let second = monthly_profile(date(2024, 6, 30), None);
        let third = monthly_profile(date(2024, 7, 1), None);

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
        assert!(!first.overlaps(&third));
    }

    #[test]
    fn test_open_ended_windows_always_overlap_each_other() {
        let first = monthly_profile(date(2024, 1, 1), None);
        let second = monthly_profile(date(2025, 1, 1), None);
        assert!(first.overlaps(&second));
    }

    #[test]
    fn test_pay_type_serialization_is_tagged() {
        let pay_type = PayType::DailyWage {
            trade_code: "MASON".to_string(),
            per_day_override: Some(dec("850")),
            ot_override: None,
        };
        let json = serde_json::to_string(&pay_type).unwrap();
        assert!(json.contains("\"pay_type\":\"daily_wage\""));
        assert!(json.contains("MASON"));

        let back: PayType = serde_json::from_str(&json).unwrap();
        assert_eq!(pay_type, back);
    }

    #[test]
    fn test_pay_cycle_round_trip() {
        let cycle = PayCycle {
            company_id: Uuid::new_v4(),
            anchor_day: 1,
            payday_rule: "last_working_day".to_string(),
            timezone: "Asia/Kolkata".to_string(),
        };
        let json = serde_json::to_string(&cycle).unwrap();
        let back: PayCycle = serde_json::from_str(&json).unwrap();
        assert_eq!(cycle, back);
    }

    #[test]
    fn test_profile_deserialization_with_flattened_pay_type() {
        let json = r#"{
            "id": "12345678-1234-1234-1234-123456789012",
            "employee_id": "12345678-1234-1234-1234-123456789013",
            "pay_type": "monthly_fixed",
            "base_monthly": "45000",
            "effective_from": "2024-01-01"
        }"#;

        let profile: EmployeePayProfile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.pay_type,
            PayType::MonthlyFixed {
                base_monthly: dec("45000")
            }
        );
        assert_eq!(profile.incentive_percent, Decimal::ZERO);
        assert!(profile.effective_to.is_none());
    }
}
