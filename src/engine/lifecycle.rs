//! Pay run lifecycle transitions.
//!
//! Runs move `draft → calculated → approved → locked`; `unlock` reverts a
//! locked run to approved and `delete` is allowed from draft only. Every
//! transition re-reads the status inside the store's critical section and
//! refuses to proceed from a disallowed state, so no partial mutation can
//! happen before the check.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayRun, RunStatus};

use super::PayrollEngine;

/// Returns a conflict error unless the run's status is in `allowed`.
pub(crate) fn ensure_status(
    run: &PayRun,
    operation: &'static str,
    allowed: &[RunStatus],
) -> EngineResult<()> {
    if allowed.contains(&run.status) {
        return Ok(());
    }
    Err(EngineError::StateConflict {
        operation,
        current: run.status,
        allowed: allowed.to_vec(),
    })
}

impl PayrollEngine {
    /// Approves a calculated run.
    pub fn approve_run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "approve", &[RunStatus::Calculated])?;
        run.status = RunStatus::Approved;
        run.approved_at = Some(Utc::now());
        info!(run_id = %run_id, "Approved pay run");
        Ok(run.clone())
    }

    /// Locks an approved run; locked runs reject all further mutation.
    pub fn lock_run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "lock", &[RunStatus::Approved])?;
        run.status = RunStatus::Locked;
        run.locked_at = Some(Utc::now());
        info!(run_id = %run_id, "Locked pay run");
        Ok(run.clone())
    }

    /// Unlocks a locked run back to approved.
    pub fn unlock_run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "unlock", &[RunStatus::Locked])?;
        run.status = RunStatus::Approved;
        run.locked_at = None;
        info!(run_id = %run_id, "Unlocked pay run");
        Ok(run.clone())
    }

    /// Deletes a draft run and the items it owns.
    pub fn delete_run(&self, run_id: Uuid) -> EngineResult<()> {
        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "delete", &[RunStatus::Draft])?;
        data.runs.remove(&run_id);
        info!(run_id = %run_id, "Deleted pay run");
        Ok(())
    }
}
