//! Attendance rollup gateway.
//!
//! Attendance-punch ingestion lives outside this engine; calculation only
//! consumes a per-employee rollup for the run's period. The gateway must
//! fail closed: a failed rollup aborts the calculation instead of silently
//! proceeding with partial data.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// One employee's attendance rollup for a period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceSummary {
    /// Days worked in the period.
    pub days_worked: Decimal,
    /// Loss-of-pay days in the period.
    pub lop_days: Decimal,
    /// Overtime hours in the period.
    pub ot_hours: Decimal,
    /// Paid holidays in the period.
    pub holidays: Decimal,
    /// Weekly-off days in the period.
    pub weekly_off: Decimal,
}

/// Supplies per-employee attendance rollups for a company and period.
///
/// Employees absent from the returned map default to zero on all fields.
pub trait AttendanceGateway: Send + Sync {
    /// Fetches the rollup for every employee of the company in the window.
    fn rollup(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> EngineResult<HashMap<Uuid, AttendanceSummary>>;
}

/// An in-memory gateway backed by a map, for tests and local setups.
#[derive(Debug, Default)]
pub struct InMemoryAttendance {
    records: RwLock<HashMap<Uuid, AttendanceSummary>>,
}

impl InMemoryAttendance {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rollup for an employee, replacing any previous one.
    pub fn set(&self, employee_id: Uuid, summary: AttendanceSummary) {
        if let Ok(mut records) = self.records.write() {
            records.insert(employee_id, summary);
        }
    }
}

impl AttendanceGateway for InMemoryAttendance {
    fn rollup(
        &self,
        _company_id: Uuid,
        _period_start: NaiveDate,
        _period_end: NaiveDate,
    ) -> EngineResult<HashMap<Uuid, AttendanceSummary>> {
        self.records
            .read()
            .map(|records| records.clone())
            .map_err(|_| EngineError::AttendanceUnavailable {
                message: "attendance store poisoned".to_string(),
            })
    }
}
