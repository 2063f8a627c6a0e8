//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod adjustment;
mod audit;
mod component;
mod pay_run;
mod profile;

pub use adjustment::{Adjustment, AdjustmentKind, AdjustmentStatus};
pub use audit::{AmountChange, ComplianceAuditEntry, ConfigRef};
pub use component::{ComponentCode, PayComponent};
pub use pay_run::{PayRun, PayRunItem, RunStatus, RunTotals};
pub use profile::{EmployeePayProfile, PayCycle, PayPolicy, PayType, TradeCategory};
