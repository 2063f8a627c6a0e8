//! Statutory configuration loading.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! rule rows from a YAML file into an immutable [`ConfigSet`]. Loading is an
//! explicit, idempotent initialization step invoked by whoever builds the
//! application state; nothing on the request path re-reads files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::resolver::ConfigSet;
use super::types::{StatutoryConfig, StatutoryPayload};

/// A statutory rule row as written in YAML, before an id is assigned.
#[derive(Debug, Clone, Deserialize)]
struct StatutoryConfigRow {
    #[serde(default)]
    company_id: Option<Uuid>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    priority: i32,
    effective_from: NaiveDate,
    #[serde(default)]
    effective_to: Option<NaiveDate>,
    payload: StatutoryPayload,
}

#[derive(Debug, Clone, Deserialize)]
struct StatutoryFile {
    configs: Vec<StatutoryConfigRow>,
}

/// Loads statutory configuration from YAML.
///
/// # File layout
///
/// ```text
/// config/statutory-in/
/// └── statutory.yaml   # list of statutory rule rows under `configs:`
/// ```
///
/// Row ids are assigned in file order, ascending, so a row appearing later
/// in the file is the more recently created one for tie-breaking purposes.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let configs = ConfigLoader::load("./config/statutory-in").unwrap();
/// assert!(!configs.all().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the statutory rule set from the given directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if `statutory.yaml` is missing and
    /// `ConfigParseError` if the YAML is malformed or a row fails validation
    /// (negative rates, empty PT slab tables).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<ConfigSet> {
        let file_path = path.as_ref().join("statutory.yaml");
        let path_str = file_path.display().to_string();

        let content = fs::read_to_string(&file_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let file: StatutoryFile =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let mut configs = Vec::with_capacity(file.configs.len());
        for (index, row) in file.configs.into_iter().enumerate() {
            let id = index as u64 + 1;
            validate_payload(&row.payload).map_err(|message| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: format!("row {id}: {message}"),
            })?;
            configs.push(StatutoryConfig {
                id,
                company_id: row.company_id,
                state: row.state,
                priority: row.priority,
                effective_from: row.effective_from,
                effective_to: row.effective_to,
                payload: row.payload,
            });
        }

        Ok(ConfigSet::new(configs))
    }
}

fn validate_payload(payload: &StatutoryPayload) -> Result<(), String> {
    match payload {
        StatutoryPayload::Pf(pf) => {
            for (name, rate) in [
                ("emp_rate", pf.emp_rate),
                ("er_eps_rate", pf.er_eps_rate),
                ("er_epf_rate", pf.er_epf_rate),
            ] {
                if rate < Decimal::ZERO {
                    return Err(format!("PF {name} must not be negative"));
                }
            }
            if pf.wage_cap.is_some_and(|cap| cap <= Decimal::ZERO) {
                return Err("PF wage_cap must be positive".to_string());
            }
            if crate::models::ComponentCode::from_label(&pf.base_tag).is_none() {
                return Err(format!("PF base_tag '{}' is not a known component", pf.base_tag));
            }
        }
        StatutoryPayload::Esi(esi) => {
            if esi.emp_rate < Decimal::ZERO || esi.er_rate < Decimal::ZERO {
                return Err("ESI rates must not be negative".to_string());
            }
        }
        StatutoryPayload::Pt(pt) => {
            if pt.slabs.is_empty() {
                return Err("PT slab table must not be empty".to_string());
            }
            if pt.state.trim().is_empty() {
                return Err("PT config must declare a state".to_string());
            }
        }
        StatutoryPayload::Lwf(lwf) => {
            if lwf.months.iter().any(|m| *m < 1 || *m > 12) {
                return Err("LWF months must be in 1..=12".to_string());
            }
        }
    }
    Ok(())
}
