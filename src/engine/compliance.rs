//! Statutory compliance preview and apply.
//!
//! Preview is strictly read-only: it resolves the active configuration per
//! statutory type as of the run's period end, computes every item's PF, ESI,
//! PT and LWF amounts, and reports which required types have no resolvable
//! configuration. Apply re-runs a fresh preview inside the store's critical
//! section, refuses to write anything when a required type is missing, and
//! otherwise upserts the statutory component lines with a full audit entry
//! per item.
//!
//! LWF is month-gated by nature, so an absent LWF configuration never blocks
//! apply; its amounts appear in preview totals only.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{calculate_esi, calculate_lwf, calculate_pf, calculate_pt};
use crate::config::{StatutoryConfig, StatutoryPayload, StatutoryType};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AmountChange, ComplianceAuditEntry, ComponentCode, ConfigRef, PayComponent, PayRun,
    PayRunItem, RunStatus,
};

use super::PayrollEngine;
use super::lifecycle::ensure_status;

/// Provident fund amounts previewed for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfPreview {
    /// The configuration row the amounts came from.
    pub config_id: u64,
    /// The capped wage base.
    pub wage_base: Decimal,
    /// Employee deduction.
    pub employee: Decimal,
    /// Employer pension scheme share.
    pub employer_eps: Decimal,
    /// Employer fund share.
    pub employer_epf: Decimal,
}

/// State insurance amounts previewed for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsiPreview {
    /// The configuration row the amounts came from.
    pub config_id: u64,
    /// The wage base; zero above the threshold.
    pub wage_base: Decimal,
    /// Employee deduction.
    pub employee: Decimal,
    /// Employer contribution.
    pub employer: Decimal,
}

/// Professional tax amount previewed for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtPreview {
    /// The configuration row the amount came from.
    pub config_id: u64,
    /// The slab amount owed.
    pub amount: Decimal,
}

/// Welfare fund amounts previewed for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwfPreview {
    /// The configuration row the amounts came from.
    pub config_id: u64,
    /// Fixed employee contribution.
    pub employee: Decimal,
    /// Fixed employer contribution.
    pub employer: Decimal,
}

/// One run item's previewed statutory amounts.
///
/// A `None` block means the statutory type is inapplicable for this item
/// (no configuration resolved, state mismatch, or month gate), not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPreview {
    /// The run item previewed.
    pub item_id: Uuid,
    /// The employee the item belongs to.
    pub employee_id: Uuid,
    /// The item's gross pay.
    pub gross: Decimal,
    /// Provident fund block.
    pub pf: Option<PfPreview>,
    /// State insurance block.
    pub esi: Option<EsiPreview>,
    /// Professional tax block.
    pub pt: Option<PtPreview>,
    /// Welfare fund block.
    pub lwf: Option<LwfPreview>,
    /// Employee-side deductions an apply would write (PF + ESI + PT).
    pub projected_deductions: Decimal,
    /// Net pay an apply would leave (`gross - projected_deductions`).
    pub projected_net: Decimal,
}

/// Company-level employee deduction totals across the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDeductionTotals {
    /// Total provident fund deductions.
    pub pf: Decimal,
    /// Total state insurance deductions.
    pub esi: Decimal,
    /// Total professional tax.
    pub pt: Decimal,
    /// Total welfare fund deductions.
    pub lwf: Decimal,
    /// Sum of all of the above.
    pub all: Decimal,
}

/// Company-level employer cost totals across the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerCostTotals {
    /// Total state insurance contributions.
    pub esi: Decimal,
    /// Total pension scheme contributions.
    pub pf_eps: Decimal,
    /// Total fund contributions.
    pub pf_epf: Decimal,
    /// Sum of all of the above.
    pub all: Decimal,
}

/// The totals block of a compliance preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewTotals {
    /// Employee-side deduction totals, including welfare fund.
    pub employee_deductions: EmployeeDeductionTotals,
    /// Employer-side cost totals.
    pub employer_costs: EmployerCostTotals,
}

/// The full read-only result of a compliance preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompliancePreview {
    /// The run previewed.
    pub run_id: Uuid,
    /// The state whose PT slab table and scoped rows were used.
    pub state: String,
    /// Per-item previews, in run item order.
    pub items: Vec<ItemPreview>,
    /// Company-level totals.
    pub totals: PreviewTotals,
    /// Required statutory types (PF, ESI, PT) with no resolvable
    /// configuration as of the period end.
    pub missing_config: Vec<StatutoryType>,
    /// True when `missing_config` is empty.
    pub can_apply: bool,
}

struct ResolvedConfigs<'a> {
    pf: Option<&'a StatutoryConfig>,
    esi: Option<&'a StatutoryConfig>,
    pt: Option<&'a StatutoryConfig>,
    lwf: Option<&'a StatutoryConfig>,
}

impl PayrollEngine {
    /// Builds a read-only compliance preview for a run.
    ///
    /// Resolves the active configuration row per statutory type for the
    /// run's company, the given state and the period end, and computes what
    /// an apply would write. Never mutates the run.
    pub fn build_preview(&self, run_id: Uuid, state: &str) -> EngineResult<CompliancePreview> {
        let run = self.get_run(run_id)?;
        Ok(self.preview_for_run(&run, state))
    }

    /// Applies statutory deductions to a run.
    ///
    /// Allowed from `calculated` or `approved`. Re-runs a fresh preview
    /// inside the critical section; when any required type is missing the
    /// apply fails with `MissingStatutoryConfig` and writes nothing.
    /// Otherwise each item's statutory component lines are upserted, its
    /// `deductions` and `net` recomputed, and one audit entry appended.
    /// A calculated run auto-transitions to approved.
    pub fn apply_compliance(&self, run_id: Uuid, state: &str) -> EngineResult<PayRun> {
        let allowed = [RunStatus::Calculated, RunStatus::Approved];

        let mut data = self.store().lock()?;
        let run = data
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::RunNotFound { run_id })?;
        ensure_status(run, "apply compliance", &allowed)?;

        let preview = self.preview_for_run(run, state);
        if !preview.can_apply {
            return Err(EngineError::MissingStatutoryConfig {
                missing: preview.missing_config,
            });
        }

        let now = Utc::now();
        for (item, item_preview) in run.items.iter_mut().zip(preview.items.iter()) {
            apply_to_item(item, item_preview, now);
        }

        if run.status == RunStatus::Calculated {
            run.status = RunStatus::Approved;
            run.approved_at = Some(now);
        }
        run.snapshot_totals();

        info!(
            run_id = %run_id,
            state = %state,
            employee_deductions = %preview.totals.employee_deductions.all,
            "Applied statutory compliance"
        );
        Ok(run.clone())
    }

    fn resolve_for_run<'a>(&'a self, run: &PayRun, state: &str) -> ResolvedConfigs<'a> {
        let on_date = run.period_end;
        let active = |statutory_type| {
            self.configs()
                .resolve_active(statutory_type, run.company_id, state, on_date)
        };
        ResolvedConfigs {
            pf: active(StatutoryType::Pf),
            esi: active(StatutoryType::Esi),
            pt: active(StatutoryType::Pt),
            lwf: active(StatutoryType::Lwf),
        }
    }

    fn preview_for_run(&self, run: &PayRun, state: &str) -> CompliancePreview {
        let resolved = self.resolve_for_run(run, state);

        let mut missing_config = Vec::new();
        for (statutory_type, config) in [
            (StatutoryType::Pf, resolved.pf),
            (StatutoryType::Esi, resolved.esi),
            (StatutoryType::Pt, resolved.pt),
        ] {
            if config.is_none() {
                missing_config.push(statutory_type);
            }
        }

        let mut totals = PreviewTotals::default();
        let items = run
            .items
            .iter()
            .map(|item| preview_item(item, run, state, &resolved, &mut totals))
            .collect();

        let deductions = &mut totals.employee_deductions;
        deductions.all = deductions.pf + deductions.esi + deductions.pt + deductions.lwf;
        let costs = &mut totals.employer_costs;
        costs.all = costs.esi + costs.pf_eps + costs.pf_epf;

        CompliancePreview {
            run_id: run.id,
            state: state.to_string(),
            items,
            totals,
            can_apply: missing_config.is_empty(),
            missing_config,
        }
    }
}

fn preview_item(
    item: &PayRunItem,
    run: &PayRun,
    state: &str,
    resolved: &ResolvedConfigs<'_>,
    totals: &mut PreviewTotals,
) -> ItemPreview {
    let pf = resolved.pf.and_then(|config| match &config.payload {
        StatutoryPayload::Pf(pf) => {
            let result = calculate_pf(item, pf);
            Some(PfPreview {
                config_id: config.id,
                wage_base: result.wage_base,
                employee: result.employee,
                employer_eps: result.employer_eps,
                employer_epf: result.employer_epf,
            })
        }
        _ => None,
    });

    let esi = resolved.esi.and_then(|config| match &config.payload {
        StatutoryPayload::Esi(esi) => {
            let result = calculate_esi(item, esi);
            Some(EsiPreview {
                config_id: config.id,
                wage_base: result.wage_base,
                employee: result.employee,
                employer: result.employer,
            })
        }
        _ => None,
    });

    let pt = resolved.pt.and_then(|config| match &config.payload {
        StatutoryPayload::Pt(pt) => calculate_pt(item, pt, state).map(|result| PtPreview {
            config_id: config.id,
            amount: result.amount,
        }),
        _ => None,
    });

    let lwf = resolved.lwf.and_then(|config| match &config.payload {
        StatutoryPayload::Lwf(lwf) => {
            calculate_lwf(lwf, run.period_end).map(|result| LwfPreview {
                config_id: config.id,
                employee: result.employee,
                employer: result.employer,
            })
        }
        _ => None,
    });

    let mut projected_deductions = Decimal::ZERO;
    if let Some(pf) = &pf {
        projected_deductions += pf.employee;
        totals.employee_deductions.pf += pf.employee;
        totals.employer_costs.pf_eps += pf.employer_eps;
        totals.employer_costs.pf_epf += pf.employer_epf;
    }
    if let Some(esi) = &esi {
        projected_deductions += esi.employee;
        totals.employee_deductions.esi += esi.employee;
        totals.employer_costs.esi += esi.employer;
    }
    if let Some(pt) = &pt {
        projected_deductions += pt.amount;
        totals.employee_deductions.pt += pt.amount;
    }
    if let Some(lwf) = &lwf {
        totals.employee_deductions.lwf += lwf.employee;
    }

    ItemPreview {
        item_id: item.id,
        employee_id: item.employee_id,
        gross: item.gross,
        pf,
        esi,
        pt,
        lwf,
        projected_deductions,
        projected_net: item.gross - projected_deductions,
    }
}

/// Writes one item's previewed amounts and appends the audit entry.
fn apply_to_item(
    item: &mut PayRunItem,
    preview: &ItemPreview,
    now: chrono::DateTime<Utc>,
) {
    let mut changes = std::collections::BTreeMap::new();
    let mut configs_used = Vec::new();

    let mut lines: Vec<(ComponentCode, Decimal)> = Vec::new();
    if let Some(pf) = &preview.pf {
        lines.push((ComponentCode::PfEmployee, pf.employee));
        lines.push((ComponentCode::PfEmployerEps, pf.employer_eps));
        lines.push((ComponentCode::PfEmployerEpf, pf.employer_epf));
        configs_used.push(ConfigRef {
            statutory_type: StatutoryType::Pf,
            config_id: pf.config_id,
        });
    }
    if let Some(esi) = &preview.esi {
        lines.push((ComponentCode::EsiEmployee, esi.employee));
        lines.push((ComponentCode::EsiEmployer, esi.employer));
        configs_used.push(ConfigRef {
            statutory_type: StatutoryType::Esi,
            config_id: esi.config_id,
        });
    }
    if let Some(pt) = &preview.pt {
        lines.push((ComponentCode::Pt, pt.amount));
        configs_used.push(ConfigRef {
            statutory_type: StatutoryType::Pt,
            config_id: pt.config_id,
        });
    }

    for (code, amount) in lines {
        let old = match item.components.iter_mut().find(|c| c.code == code) {
            Some(existing) => {
                let old = existing.amount;
                existing.amount = amount;
                Some(old)
            }
            None => {
                item.components.push(PayComponent::new(code.clone(), amount));
                None
            }
        };
        changes.insert(code.label(), AmountChange { old, new: amount });
    }

    item.deductions = item.statutory_deductions();
    item.net = item.gross - item.deductions;
    item.audit.push(ComplianceAuditEntry {
        timestamp: now,
        changes,
        configs_used,
    });
}
