//! Compliance audit trail models.
//!
//! Every compliance apply appends one entry per run item recording the old
//! and new amount for each statutory line it touched, together with the
//! configuration rows that produced the amounts. History is append-only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::StatutoryType;

/// The before/after amounts for a single component line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountChange {
    /// The amount before this apply, if the line already existed.
    pub old: Option<Decimal>,
    /// The amount after this apply.
    pub new: Decimal,
}

/// A reference to a statutory configuration row used by an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRef {
    /// The statutory type the row configures.
    pub statutory_type: StatutoryType,
    /// The configuration row id.
    pub config_id: u64,
}

/// One append-only audit entry on a run item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAuditEntry {
    /// When the apply happened.
    pub timestamp: DateTime<Utc>,
    /// Old/new amounts keyed by component label (e.g. `PF_EMP`).
    pub changes: BTreeMap<String, AmountChange>,
    /// The configuration rows the amounts were derived from.
    pub configs_used: Vec<ConfigRef>,
}
