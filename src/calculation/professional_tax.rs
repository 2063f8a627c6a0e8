//! Professional tax calculation.
//!
//! Professional tax is a state subject: a slab table is evaluated only when
//! its declared state matches the requested state. Slabs are scanned in the
//! order configuration gives them, first inclusive match wins, and a wage
//! matching no slab owes nothing.

use rust_decimal::Decimal;

use crate::config::PtConfig;
use crate::models::PayRunItem;

/// The result block of a professional tax calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PtResult {
    /// The wage base (gross pay).
    pub wage_base: Decimal,
    /// The slab amount owed.
    pub amount: Decimal,
}

/// Calculates professional tax for a run item.
///
/// Returns `None` when the configuration's declared state does not match
/// `state`; the statutory type is then inapplicable for this item rather
/// than an error.
pub fn calculate_pt(item: &PayRunItem, config: &PtConfig, state: &str) -> Option<PtResult> {
    if config.state != state {
        return None;
    }

    let wage_base = item.gross;
    let amount = config
        .slabs
        .iter()
        .find(|slab| slab.contains(wage_base))
        .map(|slab| slab.amount)
        .unwrap_or(Decimal::ZERO);

    Some(PtResult { wage_base, amount })
}
