//! The pay run engine: lifecycle state machine, calculation orchestrator,
//! compliance preview/apply and adjustment merging.
//!
//! All operations assume the caller has already been authorized; this engine
//! exposes no authorization logic of its own. Errors are local to the run
//! being operated on and nothing here retries automatically.

mod adjustments;
mod compliance;
mod gateway;
mod lifecycle;
mod orchestrator;
mod store;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::config::ConfigSet;
use crate::error::{EngineError, EngineResult};
use crate::models::PayRun;

pub use adjustments::AdjustmentWindow;
pub use compliance::{
    CompliancePreview, EmployeeDeductionTotals, EmployerCostTotals, EsiPreview, ItemPreview,
    LwfPreview, PfPreview, PreviewTotals, PtPreview,
};
pub use gateway::{AttendanceGateway, AttendanceSummary, InMemoryAttendance};
pub use store::PayrollStore;

/// The payroll engine: owns the store, the statutory configuration set and
/// the attendance gateway.
pub struct PayrollEngine {
    store: PayrollStore,
    configs: ConfigSet,
    attendance: Arc<dyn AttendanceGateway>,
}

impl PayrollEngine {
    /// Creates an engine over a loaded configuration set and a gateway.
    pub fn new(configs: ConfigSet, attendance: Arc<dyn AttendanceGateway>) -> Self {
        Self {
            store: PayrollStore::new(),
            configs,
            attendance,
        }
    }

    /// Returns the backing store, for seeding profiles, policies, trades
    /// and adjustments.
    pub fn store(&self) -> &PayrollStore {
        &self.store
    }

    /// Returns the statutory configuration set.
    pub fn configs(&self) -> &ConfigSet {
        &self.configs
    }

    /// Creates a new draft run for a company and period.
    ///
    /// The period is validated before any state changes: `period_start`
    /// must not be after `period_end`.
    pub fn create_run(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> EngineResult<PayRun> {
        if period_start > period_end {
            return Err(EngineError::Validation {
                field: "period".to_string(),
                message: format!("period_start {period_start} is after period_end {period_end}"),
            });
        }

        let run = PayRun::new(company_id, period_start, period_end);
        let mut data = self.store.lock()?;
        data.runs.insert(run.id, run.clone());
        info!(run_id = %run.id, company_id = %company_id, "Created pay run");
        Ok(run)
    }

    /// Returns a snapshot of a run with its items.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<PayRun> {
        self.store.get_run(run_id)
    }
}
