//! Provident fund calculation.
//!
//! The wage base is the amount of the component named by the configuration's
//! `base_tag` (normally `BASIC`), capped at the configured wage cap. The
//! employee deduction and the two employer shares (pension scheme and fund)
//! are each rounded to two decimal places independently.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PfConfig;
use crate::models::{ComponentCode, PayRunItem};

/// The result block of a provident fund calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PfResult {
    /// The wage base after capping.
    pub wage_base: Decimal,
    /// The wage base rounded to whole units, for EPF display only; the
    /// computed amounts use the exact base.
    pub rounded_for_epf: Decimal,
    /// Employee deduction (`wage_base * emp_rate`).
    pub employee: Decimal,
    /// Employer pension scheme share (`wage_base * er_eps_rate`).
    pub employer_eps: Decimal,
    /// Employer fund share (`wage_base * er_epf_rate`).
    pub employer_epf: Decimal,
}

/// Calculates provident fund amounts for a run item.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_pf;
/// use payroll_engine::config::PfConfig;
/// use payroll_engine::models::{ComponentCode, PayComponent, PayRunItem};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// use uuid::Uuid;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let item = PayRunItem {
///     id: Uuid::new_v4(),
///     employee_id: Uuid::new_v4(),
///     days_worked: dec("26"),
///     lop_days: Decimal::ZERO,
///     ot_hours: Decimal::ZERO,
///     gross: dec("15000"),
///     deductions: Decimal::ZERO,
///     net: dec("15000"),
///     components: vec![PayComponent::new(ComponentCode::Basic, dec("15000"))],
///     remarks: None,
///     audit: vec![],
/// };
/// let config = PfConfig {
///     base_tag: "BASIC".to_string(),
///     wage_cap: Some(dec("15000")),
///     emp_rate: dec("0.12"),
///     er_eps_rate: dec("0.0833"),
///     er_epf_rate: dec("0.0367"),
/// };
///
/// let result = calculate_pf(&item, &config);
/// assert_eq!(result.employee, dec("1800.00"));
/// ```
pub fn calculate_pf(item: &PayRunItem, config: &PfConfig) -> PfResult {
    // base_tag is validated against the component table at the loader boundary
    let base_code =
        ComponentCode::from_label(&config.base_tag).unwrap_or(ComponentCode::Basic);
    let mut wage_base = item.component_amount(&base_code);
    if let Some(cap) = config.wage_cap {
        wage_base = wage_base.min(cap);
    }

    PfResult {
        wage_base,
        rounded_for_epf: wage_base
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        employee: round_money(wage_base * config.emp_rate),
        employer_eps: round_money(wage_base * config.er_eps_rate),
        employer_epf: round_money(wage_base * config.er_epf_rate),
    }
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayComponent;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item_with_basic(basic: Decimal) -> PayRunItem {
        PayRunItem {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            days_worked: dec("26"),
            lop_days: Decimal::ZERO,
            ot_hours: Decimal::ZERO,
            gross: basic,
            deductions: Decimal::ZERO,
            net: basic,
            components: vec![PayComponent::new(ComponentCode::Basic, basic)],
            remarks: None,
            audit: vec![],
        }
    }

    fn standard_config() -> PfConfig {
        PfConfig {
            base_tag: "BASIC".to_string(),
            wage_cap: Some(dec("15000")),
            emp_rate: dec("0.12"),
            er_eps_rate: dec("0.0833"),
            er_epf_rate: dec("0.0367"),
        }
    }

    /// 15,000 BASIC at the statutory rates: 1,800.00 / 1,249.50 / 550.50.
    #[test]
    fn test_standard_rates_at_cap() {
        let result = calculate_pf(&item_with_basic(dec("15000")), &standard_config());
        assert_eq!(result.wage_base, dec("15000"));
        assert_eq!(result.employee, dec("1800.00"));
        assert_eq!(result.employer_eps, dec("1249.50"));
        assert_eq!(result.employer_epf, dec("550.50"));
    }

    #[test]
    fn test_wage_cap_limits_base() {
        let result = calculate_pf(&item_with_basic(dec("40000")), &standard_config());
        assert_eq!(result.wage_base, dec("15000"));
        assert_eq!(result.employee, dec("1800.00"));
    }

    #[test]
    fn test_below_cap_uses_actual_basic() {
        let result = calculate_pf(&item_with_basic(dec("10000")), &standard_config());
        assert_eq!(result.wage_base, dec("10000"));
        assert_eq!(result.employee, dec("1200.00"));
        assert_eq!(result.employer_eps, dec("833.00"));
        assert_eq!(result.employer_epf, dec("367.00"));
    }

    #[test]
    fn test_no_cap_configured() {
        let mut config = standard_config();
        config.wage_cap = None;
        let result = calculate_pf(&item_with_basic(dec("40000")), &config);
        assert_eq!(result.wage_base, dec("40000"));
        assert_eq!(result.employee, dec("4800.00"));
    }

    #[test]
    fn test_amounts_rounded_independently() {
        // 12345 * 0.0833 = 1028.3385 -> 1028.34; * 0.0367 = 453.0615 -> 453.06
        let mut config = standard_config();
        config.wage_cap = None;
        let result = calculate_pf(&item_with_basic(dec("12345")), &config);
        assert_eq!(result.employer_eps, dec("1028.34"));
        assert_eq!(result.employer_epf, dec("453.06"));
    }

    #[test]
    fn test_rounded_for_epf_does_not_change_amounts() {
        let mut config = standard_config();
        config.wage_cap = None;
        let result = calculate_pf(&item_with_basic(dec("12345.60")), &config);
        assert_eq!(result.rounded_for_epf, dec("12346"));
        // Employee amount still derives from the exact base.
        assert_eq!(result.employee, dec("1481.47"));
    }

    #[test]
    fn test_missing_basic_component_yields_zero_base() {
        let mut item = item_with_basic(dec("15000"));
        item.components.clear();
        let result = calculate_pf(&item, &standard_config());
        assert_eq!(result.wage_base, Decimal::ZERO);
        assert_eq!(result.employee, dec("0.00"));
    }
}
