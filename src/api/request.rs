//! Request types for the payroll engine API.
//!
//! Thin deserialization DTOs; validation beyond shape happens in the
//! engine so API and direct callers share one set of rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AdjustmentWindow;

/// Body of `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// The company the run belongs to.
    pub company_id: Uuid,
    /// First day of the pay period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub period_end: NaiveDate,
}

/// Body of `POST /runs/:id/compliance/apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceApplyRequest {
    /// The state whose professional tax slab table and scoped rows apply.
    pub state: String,
}

/// Body of `POST /runs/:id/adjustments/apply`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustmentApplyRequest {
    /// Optional selection window; defaults to the run's period.
    #[serde(default)]
    pub window: Option<AdjustmentWindow>,
}
