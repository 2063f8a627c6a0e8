//! Statutory configuration types.
//!
//! Regulatory rules are stored as effective-dated rows scoped to a company,
//! a state, both, or neither. Each row carries a payload specific to its
//! statutory type, modelled as a tagged enum so untyped documents never
//! cross the resolver boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The statutory deduction/contribution categories this engine computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutoryType {
    /// Provident Fund.
    Pf,
    /// Employee State Insurance.
    Esi,
    /// Professional Tax.
    Pt,
    /// Labour Welfare Fund.
    Lwf,
}

impl StatutoryType {
    /// Returns the conventional uppercase abbreviation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatutoryType::Pf => "PF",
            StatutoryType::Esi => "ESI",
            StatutoryType::Pt => "PT",
            StatutoryType::Lwf => "LWF",
        }
    }
}

impl std::fmt::Display for StatutoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provident fund rates and wage cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfConfig {
    /// Component whose amount forms the wage base; defaults to `BASIC`.
    #[serde(default = "default_base_tag")]
    pub base_tag: String,
    /// Optional cap applied to the wage base.
    #[serde(default)]
    pub wage_cap: Option<Decimal>,
    /// Employee deduction rate (fraction, e.g. 0.12).
    pub emp_rate: Decimal,
    /// Employer pension scheme rate.
    pub er_eps_rate: Decimal,
    /// Employer fund rate.
    pub er_epf_rate: Decimal,
}

fn default_base_tag() -> String {
    "BASIC".to_string()
}

/// Employee state insurance rates and wage ceiling.
///
/// The threshold is re-evaluated every period. Real ESI rules lock a
/// worker's contribution status for the six-month wage period once enrolled;
/// that half-year lock is a known simplification carried from the source
/// system, and downstream consumers depend on the per-period behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsiConfig {
    /// Gross wage ceiling; above it ESI does not apply.
    #[serde(default)]
    pub threshold: Option<Decimal>,
    /// Employee deduction rate.
    pub emp_rate: Decimal,
    /// Employer contribution rate.
    pub er_rate: Decimal,
}

/// One professional tax slab over an inclusive wage range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtSlab {
    /// Lower bound of the slab (inclusive).
    pub min: Decimal,
    /// Upper bound of the slab (inclusive); open-ended if absent.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// The tax amount for wages inside this slab.
    pub amount: Decimal,
}

impl PtSlab {
    /// Returns true if `wage` falls inside this slab.
    pub fn contains(&self, wage: Decimal) -> bool {
        wage >= self.min && self.max.is_none_or(|max| wage <= max)
    }
}

/// Professional tax slab table for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtConfig {
    /// The state this slab table belongs to.
    pub state: String,
    /// Slabs evaluated in the order given; first match wins.
    pub slabs: Vec<PtSlab>,
}

/// Labour welfare fund fixed contributions, gated by deduction months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwfConfig {
    /// Months (1-12) the contribution is deducted in; empty means every month.
    #[serde(default)]
    pub months: Vec<u32>,
    /// Fixed employee contribution.
    pub emp_amount: Decimal,
    /// Fixed employer contribution.
    pub er_amount: Decimal,
}

impl LwfConfig {
    /// Returns true if the contribution applies in the given month (1-12).
    pub fn applies_in_month(&self, month: u32) -> bool {
        self.months.is_empty() || self.months.contains(&month)
    }
}

/// The type-specific payload of a statutory configuration row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatutoryPayload {
    /// Provident fund parameters.
    Pf(PfConfig),
    /// Employee state insurance parameters.
    Esi(EsiConfig),
    /// Professional tax slab table.
    Pt(PtConfig),
    /// Labour welfare fund parameters.
    Lwf(LwfConfig),
}

impl StatutoryPayload {
    /// Returns the statutory type this payload configures.
    pub fn statutory_type(&self) -> StatutoryType {
        match self {
            StatutoryPayload::Pf(_) => StatutoryType::Pf,
            StatutoryPayload::Esi(_) => StatutoryType::Esi,
            StatutoryPayload::Pt(_) => StatutoryType::Pt,
            StatutoryPayload::Lwf(_) => StatutoryType::Lwf,
        }
    }
}

/// One effective-dated, scope-resolved statutory configuration row.
///
/// Rows are immutable once loaded. A rule change is a new row with a later
/// `effective_from` that closes the previous row's `effective_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutoryConfig {
    /// Monotonic row id; later ids were created later.
    pub id: u64,
    /// Company scope; unset means any company.
    #[serde(default)]
    pub company_id: Option<Uuid>,
    /// State scope; unset means any state.
    #[serde(default)]
    pub state: Option<String>,
    /// Ordering within a tier; lower wins.
    #[serde(default)]
    pub priority: i32,
    /// First date the row is effective (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the row is effective (inclusive); open-ended if absent.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// The type-specific rule parameters.
    pub payload: StatutoryPayload,
}

impl StatutoryConfig {
    /// Returns the statutory type this row configures.
    pub fn statutory_type(&self) -> StatutoryType {
        self.payload.statutory_type()
    }

    /// Returns true if the row's effective window contains `date`.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| to >= date)
    }
}
