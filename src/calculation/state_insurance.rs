//! Employee state insurance calculation.
//!
//! The wage base is the item's gross pay. When a threshold is configured and
//! gross exceeds it, the wage base drops to zero: ESI does not apply once the
//! wage ceiling is crossed. The threshold is re-evaluated every period; the
//! statutory half-year contribution lock is a documented simplification (see
//! [`crate::config::EsiConfig`]).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::EsiConfig;
use crate::models::PayRunItem;

/// The result block of a state insurance calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct EsiResult {
    /// The wage base; zero when the threshold is crossed.
    pub wage_base: Decimal,
    /// Employee deduction (`wage_base * emp_rate`).
    pub employee: Decimal,
    /// Employer contribution (`wage_base * er_rate`).
    pub employer: Decimal,
}

/// Calculates state insurance amounts for a run item.
pub fn calculate_esi(item: &PayRunItem, config: &EsiConfig) -> EsiResult {
    let wage_base = match config.threshold {
        Some(threshold) if item.gross > threshold => Decimal::ZERO,
        _ => item.gross,
    };

    EsiResult {
        wage_base,
        employee: round_money(wage_base * config.emp_rate),
        employer: round_money(wage_base * config.er_rate),
    }
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
