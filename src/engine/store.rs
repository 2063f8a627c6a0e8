//! In-memory payroll store.
//!
//! The pay run rows and their items are the only mutable shared state in
//! the engine. A single mutex guards them: every mutating operation performs
//! its status check and its writes inside one lock hold, which gives the
//! run-scoped critical section the lifecycle requires (only one
//! `calculated → approved` transition can ever succeed). Calculators and
//! the configuration resolver stay lock-free.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Adjustment, AdjustmentStatus, EmployeePayProfile, PayPolicy, PayRun, TradeCategory,
};

#[derive(Debug, Default)]
pub(crate) struct StoreData {
    pub(crate) runs: HashMap<Uuid, PayRun>,
    pub(crate) adjustments: HashMap<Uuid, Adjustment>,
    pub(crate) profiles: Vec<EmployeePayProfile>,
    pub(crate) trades: Vec<TradeCategory>,
    pub(crate) policies: Vec<PayPolicy>,
}

/// The mutex-guarded store backing a [`super::PayrollEngine`].
#[derive(Debug, Default)]
pub struct PayrollStore {
    data: Mutex<StoreData>,
}

impl PayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> EngineResult<MutexGuard<'_, StoreData>> {
        self.data.lock().map_err(|_| EngineError::Internal {
            message: "payroll store lock poisoned".to_string(),
        })
    }

    /// Returns a snapshot of a run, including its items.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        let data = self.lock()?;
        data.runs
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }

    /// Inserts an effective-dated pay profile.
    ///
    /// Rejects the insert with `ProfileOverlap` when the new window overlaps
    /// an existing profile for the same employee, preserving the invariant
    /// that exactly one profile is effective per employee per date.
    pub fn insert_profile(&self, profile: EmployeePayProfile) -> EngineResult<()> {
        let mut data = self.lock()?;
        let overlapping = data
            .profiles
            .iter()
            .any(|p| p.employee_id == profile.employee_id && p.overlaps(&profile));
        if overlapping {
            return Err(EngineError::ProfileOverlap {
                employee_id: profile.employee_id,
            });
        }
        data.profiles.push(profile);
        Ok(())
    }

    /// Returns the profiles effective on `date`, one per employee.
    pub fn profiles_effective_on(&self, date: NaiveDate) -> EngineResult<Vec<EmployeePayProfile>> {
        let data = self.lock()?;
        Ok(data
            .profiles
            .iter()
            .filter(|p| p.is_effective_on(date))
            .cloned()
            .collect())
    }

    /// Inserts a trade category rate row.
    pub fn insert_trade(&self, trade: TradeCategory) -> EngineResult<()> {
        let mut data = self.lock()?;
        data.trades.push(trade);
        Ok(())
    }

    /// Resolves the trade rate row for a code effective on `date`.
    pub fn trade_effective_on(
        &self,
        code: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<TradeCategory>> {
        let data = self.lock()?;
        Ok(data
            .trades
            .iter()
            .filter(|t| t.code == code && t.is_effective_on(date))
            .max_by_key(|t| t.effective_from)
            .cloned())
    }

    /// Inserts a pay policy row.
    pub fn insert_policy(&self, policy: PayPolicy) -> EngineResult<()> {
        let mut data = self.lock()?;
        data.policies.push(policy);
        Ok(())
    }

    /// Resolves the pay policy for a company on `date`: the latest
    /// `effective_from` at or before the date whose window is still open.
    pub fn policy_effective_on(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<Option<PayPolicy>> {
        let data = self.lock()?;
        Ok(data
            .policies
            .iter()
            .filter(|p| p.company_id == company_id && p.is_effective_on(date))
            .max_by_key(|p| p.effective_from)
            .cloned())
    }

    /// Inserts an adjustment.
    pub fn insert_adjustment(&self, adjustment: Adjustment) -> EngineResult<()> {
        let mut data = self.lock()?;
        data.adjustments.insert(adjustment.id, adjustment);
        Ok(())
    }

    /// Moves a draft adjustment to approved.
    pub fn approve_adjustment(&self, adjustment_id: Uuid) -> EngineResult<()> {
        let mut data = self.lock()?;
        let adjustment =
            data.adjustments
                .get_mut(&adjustment_id)
                .ok_or(EngineError::Validation {
                    field: "adjustment_id".to_string(),
                    message: format!("adjustment {adjustment_id} does not exist"),
                })?;
        if adjustment.status != AdjustmentStatus::Draft {
            return Err(EngineError::Validation {
                field: "adjustment_id".to_string(),
                message: format!(
                    "adjustment {adjustment_id} is not draft and cannot be approved"
                ),
            });
        }
        adjustment.status = AdjustmentStatus::Approved;
        Ok(())
    }

    /// Returns a snapshot of an adjustment.
    pub fn get_adjustment(&self, adjustment_id: Uuid) -> EngineResult<Option<Adjustment>> {
        let data = self.lock()?;
        Ok(data.adjustments.get(&adjustment_id).cloned())
    }
}
