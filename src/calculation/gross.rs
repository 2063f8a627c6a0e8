//! Gross pay math for the two pay types.
//!
//! Monthly-fixed pay prorates loss-of-pay days against a fixed 30-day
//! divisor regardless of the actual days in the month. That divisor is an
//! intentional business rule carried from the source payroll system, not a
//! calendar bug.

use rust_decimal::Decimal;

/// The fixed divisor used for monthly loss-of-pay proration.
pub const MONTHLY_LOP_DIVISOR: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Computes gross pay for a monthly-fixed profile.
///
/// `gross = base_monthly - (base_monthly / 30) * lop_days`, floored at zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::monthly_gross;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let gross = monthly_gross(
///     Decimal::from_str("30000").unwrap(),
///     Decimal::from_str("3").unwrap(),
/// );
/// assert_eq!(gross, Decimal::from_str("27000").unwrap());
/// ```
pub fn monthly_gross(base_monthly: Decimal, lop_days: Decimal) -> Decimal {
    let prorated = base_monthly - (base_monthly / MONTHLY_LOP_DIVISOR) * lop_days;
    prorated.max(Decimal::ZERO)
}

/// Computes gross pay for a daily-wage profile.
///
/// `gross = per_day_rate * days_worked + ot_hourly_rate * ot_hours`.
pub fn daily_wage_gross(
    per_day_rate: Decimal,
    ot_hourly_rate: Decimal,
    days_worked: Decimal,
    ot_hours: Decimal,
) -> DailyWageGross {
    let base = per_day_rate * days_worked;
    let overtime = ot_hourly_rate * ot_hours;
    DailyWageGross {
        base,
        overtime,
        gross: base + overtime,
    }
}

/// The split result of a daily-wage gross computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWageGross {
    /// Pay for days worked.
    pub base: Decimal,
    /// Pay for overtime hours.
    pub overtime: Decimal,
    /// Total gross (`base + overtime`).
    pub gross: Decimal,
}
