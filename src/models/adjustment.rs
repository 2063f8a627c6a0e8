//! Ad-hoc payroll adjustment models.
//!
//! Adjustments are created manually outside the calculation path. Only
//! approved adjustments are eligible for merging into a run; once consumed
//! they are marked applied and stamped with the consuming run id so a single
//! adjustment can never pay out twice.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an adjustment adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Increases both gross and net.
    Earning,
    /// Decreases net only.
    Deduction,
}

/// The lifecycle status of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStatus {
    /// Entered but not yet signed off.
    Draft,
    /// Signed off; eligible for merge into a run.
    Approved,
    /// Consumed by a run; immutable.
    Applied,
    /// Cancelled; never eligible.
    Void,
}

/// An ad-hoc earning or deduction for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier for this adjustment.
    pub id: Uuid,
    /// The employee the adjustment belongs to.
    pub employee_id: Uuid,
    /// Earning or deduction.
    pub kind: AdjustmentKind,
    /// Short code describing the adjustment (e.g. `BONUS`, `FUEL`).
    pub code: String,
    /// The monetary amount; always positive, direction comes from `kind`.
    pub amount: Decimal,
    /// The date the adjustment applies to; used for window selection.
    pub date: NaiveDate,
    /// Current lifecycle status.
    pub status: AdjustmentStatus,
    /// The run that consumed this adjustment, once applied.
    pub applied_run_id: Option<Uuid>,
}

impl Adjustment {
    /// Creates a new draft adjustment.
    pub fn new(
        employee_id: Uuid,
        kind: AdjustmentKind,
        code: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            kind,
            code: code.into(),
            amount,
            date,
            status: AdjustmentStatus::Draft,
            applied_run_id: None,
        }
    }
}
