//! Ad-hoc adjustment merging.
//!
//! Approved adjustments dated inside the selection window are merged into a
//! run as `ADJ_*` component lines. Selection, component append and the
//! applied-status stamp all happen inside one critical section, so an
//! adjustment is consumed exactly once no matter how many runs race for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdjustmentKind, AdjustmentStatus, ComponentCode, PayComponent, PayRun, RunStatus,
};

use super::PayrollEngine;
use super::lifecycle::ensure_status;

/// An inclusive date window for adjustment selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentWindow {
    /// First eligible date (inclusive).
    pub start: NaiveDate,
    /// Last eligible date (inclusive).
    pub end: NaiveDate,
}

impl AdjustmentWindow {
    /// Returns true if `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl PayrollEngine {
    /// Merges eligible adjustments into a run.
    ///
    /// Allowed from `calculated` or `approved`. Selects approved adjustments
    /// for employees present in the run, dated inside `window` (defaulting
    /// to the run's period). Earnings raise both gross and net; deductions
    /// lower net only. Consumed adjustments are stamped applied with the
    /// run's id and are never selected again by any run.
    pub fn apply_adjustments(
        &self,
        run_id: Uuid,
        window: Option<AdjustmentWindow>,
    ) -> EngineResult<PayRun> {
        if let Some(window) = &window {
            if window.start > window.end {
                return Err(EngineError::Validation {
                    field: "window".to_string(),
                    message: format!(
                        "window start {} is after window end {}",
                        window.start, window.end
                    ),
                });
            }
        }

        let mut guard = self.store().lock()?;
        let data = &mut *guard;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(
            run,
            "apply adjustments",
            &[RunStatus::Calculated, RunStatus::Approved],
        )?;

        let window = window.unwrap_or(AdjustmentWindow {
            start: run.period_start,
            end: run.period_end,
        });

        // Stable merge order regardless of map iteration order.
        let mut eligible: Vec<Uuid> = data
            .adjustments
            .values()
            .filter(|a| a.status == AdjustmentStatus::Approved && window.contains(a.date))
            .map(|a| a.id)
            .collect();
        eligible.sort_by_key(|id| {
            let adjustment = &data.adjustments[id];
            (adjustment.date, adjustment.id)
        });

        let mut applied = 0usize;
        for adjustment_id in eligible {
            let adjustment = data
                .adjustments
                .get_mut(&adjustment_id)
                .ok_or(EngineError::Internal {
                    message: format!("adjustment {adjustment_id} vanished during merge"),
                })?;
            let Some(item) = run
                .items
                .iter_mut()
                .find(|i| i.employee_id == adjustment.employee_id)
            else {
                continue;
            };

            item.components.push(PayComponent::new(
                ComponentCode::Adjustment(adjustment.code.clone()),
                adjustment.amount,
            ));
            match adjustment.kind {
                AdjustmentKind::Earning => {
                    item.gross += adjustment.amount;
                    item.net += adjustment.amount;
                }
                AdjustmentKind::Deduction => {
                    item.net -= adjustment.amount;
                }
            }
            adjustment.status = AdjustmentStatus::Applied;
            adjustment.applied_run_id = Some(run_id);
            applied += 1;
        }

        run.snapshot_totals();
        info!(run_id = %run_id, applied, "Merged adjustments into pay run");
        Ok(run.clone())
    }
}
