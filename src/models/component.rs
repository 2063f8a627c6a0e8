//! Pay component codes and line items.
//!
//! Run items carry an ordered list of components. Codes are a closed
//! enumeration rather than free-form strings so that statutory upserts and
//! deduction totals can never silently miss a line through a typo.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The code identifying what a pay component line represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum ComponentCode {
    /// The computed base pay for the period.
    Basic,
    /// Overtime pay; emitted only when non-zero.
    Ot,
    /// Provident fund, employee deduction.
    PfEmployee,
    /// Provident fund, employer pension scheme share.
    PfEmployerEps,
    /// Provident fund, employer fund share.
    PfEmployerEpf,
    /// Employee state insurance, employee deduction.
    EsiEmployee,
    /// Employee state insurance, employer contribution.
    EsiEmployer,
    /// Professional tax, employee deduction.
    Pt,
    /// An ad-hoc adjustment line, tagged with the adjustment's code.
    Adjustment(String),
}

impl ComponentCode {
    /// Returns the wire label for this code (e.g. `PF_EMP`).
    pub fn label(&self) -> String {
        match self {
            ComponentCode::Basic => "BASIC".to_string(),
            ComponentCode::Ot => "OT".to_string(),
            ComponentCode::PfEmployee => "PF_EMP".to_string(),
            ComponentCode::PfEmployerEps => "PF_ER_EPS".to_string(),
            ComponentCode::PfEmployerEpf => "PF_ER_EPF".to_string(),
            ComponentCode::EsiEmployee => "ESI_EMP".to_string(),
            ComponentCode::EsiEmployer => "ESI_ER".to_string(),
            ComponentCode::Pt => "PT".to_string(),
            ComponentCode::Adjustment(code) => format!("ADJ_{code}"),
        }
    }

    /// Parses a wire label back into a code.
    ///
    /// This is the explicit mapping table configuration goes through (e.g.
    /// a PF `base_tag` of `BASIC`); unknown labels are rejected rather than
    /// matched loosely.
    pub fn from_label(label: &str) -> Option<ComponentCode> {
        match label {
            "BASIC" => Some(ComponentCode::Basic),
            "OT" => Some(ComponentCode::Ot),
            "PF_EMP" => Some(ComponentCode::PfEmployee),
            "PF_ER_EPS" => Some(ComponentCode::PfEmployerEps),
            "PF_ER_EPF" => Some(ComponentCode::PfEmployerEpf),
            "ESI_EMP" => Some(ComponentCode::EsiEmployee),
            "ESI_ER" => Some(ComponentCode::EsiEmployer),
            "PT" => Some(ComponentCode::Pt),
            other => other
                .strip_prefix("ADJ_")
                .map(|code| ComponentCode::Adjustment(code.to_string())),
        }
    }

    /// Returns true if this line reduces the employee's net pay.
    ///
    /// Employer-side statutory lines are company costs carried on the item
    /// for reporting; they never enter the deduction total.
    pub fn is_employee_deduction(&self) -> bool {
        matches!(
            self,
            ComponentCode::PfEmployee | ComponentCode::EsiEmployee | ComponentCode::Pt
        )
    }

    /// Returns true if this line is an employer-side statutory cost.
    pub fn is_employer_cost(&self) -> bool {
        matches!(
            self,
            ComponentCode::PfEmployerEps
                | ComponentCode::PfEmployerEpf
                | ComponentCode::EsiEmployer
        )
    }
}

/// A single component line on a pay run item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayComponent {
    /// What this line represents.
    pub code: ComponentCode,
    /// The monetary amount for this line.
    pub amount: Decimal,
}

impl PayComponent {
    /// Creates a component line.
    pub fn new(code: ComponentCode, amount: Decimal) -> Self {
        Self { code, amount }
    }
}
