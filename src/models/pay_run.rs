//! Pay run and run item models.
//!
//! A [`PayRun`] covers one company and period and exclusively owns its
//! [`PayRunItem`] rows (one per employee). The run's status field drives the
//! lifecycle state machine in the engine module.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::ComplianceAuditEntry;
use super::component::{ComponentCode, PayComponent};

/// The lifecycle status of a pay run.
///
/// Runs move `draft → calculated → approved → locked`; `unlock` reverts a
/// locked run to approved. There is no path back to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Freshly created; no items computed yet.
    Draft,
    /// Items computed; eligible for compliance apply and approval.
    Calculated,
    /// Signed off; still accepts compliance and adjustment apply.
    Approved,
    /// Frozen; rejects all further mutation until unlocked.
    Locked,
}

impl RunStatus {
    /// Returns the lowercase wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Draft => "draft",
            RunStatus::Calculated => "calculated",
            RunStatus::Approved => "approved",
            RunStatus::Locked => "locked",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The totals snapshot stored on a run when calculation succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of run items (employees) in the run.
    pub employee_count: usize,
    /// Sum of item gross amounts.
    pub gross: Decimal,
    /// Sum of item net amounts.
    pub net: Decimal,
}

/// One employee's computed payroll line within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRunItem {
    /// Unique identifier for this item.
    pub id: Uuid,
    /// The employee this item belongs to.
    pub employee_id: Uuid,
    /// Days worked in the period, from the attendance rollup.
    pub days_worked: Decimal,
    /// Loss-of-pay days in the period.
    pub lop_days: Decimal,
    /// Overtime hours in the period.
    pub ot_hours: Decimal,
    /// Gross pay for the period.
    pub gross: Decimal,
    /// Total employee-side statutory deductions.
    pub deductions: Decimal,
    /// Net pay (`gross - deductions`, shifted by adjustments).
    pub net: Decimal,
    /// Ordered component breakdown.
    pub components: Vec<PayComponent>,
    /// Free-text remarks attached during calculation.
    pub remarks: Option<String>,
    /// Append-only compliance audit history.
    #[serde(default)]
    pub audit: Vec<ComplianceAuditEntry>,
}

impl PayRunItem {
    /// Returns the component line with the given code, if present.
    pub fn component(&self, code: &ComponentCode) -> Option<&PayComponent> {
        self.components.iter().find(|c| &c.code == code)
    }

    /// Returns the amount of the component with the given code, or zero.
    pub fn component_amount(&self, code: &ComponentCode) -> Decimal {
        self.component(code)
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Sums the employee-side statutory deduction lines.
    pub fn statutory_deductions(&self) -> Decimal {
        self.components
            .iter()
            .filter(|c| c.code.is_employee_deduction())
            .map(|c| c.amount)
            .sum()
    }
}

/// A payroll run for one company and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRun {
    /// Unique identifier for this run.
    pub id: Uuid,
    /// The company the run belongs to.
    pub company_id: Uuid,
    /// First day of the pay period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub period_end: NaiveDate,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// Totals snapshot from the last successful calculation.
    pub totals: Option<RunTotals>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// When the run was last calculated.
    pub calculated_at: Option<DateTime<Utc>>,
    /// When the run was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the run was locked.
    pub locked_at: Option<DateTime<Utc>>,
    /// The run's items, one per employee; owned by the run.
    pub items: Vec<PayRunItem>,
}

impl PayRun {
    /// Creates a new draft run for the given company and period.
    pub fn new(company_id: Uuid, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            period_start,
            period_end,
            status: RunStatus::Draft,
            totals: None,
            created_at: Utc::now(),
            calculated_at: None,
            approved_at: None,
            locked_at: None,
            items: Vec::new(),
        }
    }

    /// Recomputes the totals snapshot from the current items.
    pub fn snapshot_totals(&mut self) {
        self.totals = Some(RunTotals {
            employee_count: self.items.len(),
            gross: self.items.iter().map(|i| i.gross).sum(),
            net: self.items.iter().map(|i| i.net).sum(),
        });
    }
}
