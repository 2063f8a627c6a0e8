//! Labour welfare fund calculation.
//!
//! LWF contributions are fixed amounts, not wage-based, and most states only
//! deduct them in specific months. A configuration entry applies when its
//! month list contains the period's month or declares no restriction.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::LwfConfig;

/// The result block of a welfare fund calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct LwfResult {
    /// Fixed employee contribution.
    pub employee: Decimal,
    /// Fixed employer contribution.
    pub employer: Decimal,
}

/// Calculates labour welfare fund contributions for a period date.
///
/// Returns `None` when the configuration does not apply in `on_date`'s
/// month; the statutory type is then inapplicable for this period.
pub fn calculate_lwf(config: &LwfConfig, on_date: NaiveDate) -> Option<LwfResult> {
    if !config.applies_in_month(on_date.month()) {
        return None;
    }

    Some(LwfResult {
        employee: config.emp_amount,
        employer: config.er_amount,
    })
}
