//! Tiered, effective-dated statutory configuration resolution.
//!
//! Given a statutory type, a company, a state and a date, [`ConfigSet::resolve`]
//! returns every applicable row in scope-specificity order. Callers normally
//! use only the first row as the active rule; the full ordered list is
//! exposed for audit and introspection.

use chrono::NaiveDate;
use uuid::Uuid;

use super::types::{StatutoryConfig, StatutoryType};

/// An immutable collection of statutory configuration rows.
///
/// Built once by the loader (or by tests) and shared read-only; calculations
/// never mutate it.
#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    configs: Vec<StatutoryConfig>,
}

impl ConfigSet {
    /// Creates a set from pre-built rows.
    pub fn new(configs: Vec<StatutoryConfig>) -> Self {
        Self { configs }
    }

    /// Returns all rows in the set.
    pub fn all(&self) -> &[StatutoryConfig] {
        &self.configs
    }

    /// Resolves the applicable configuration rows for a scope and date.
    ///
    /// Rows are filtered to the requested type and to effective windows
    /// containing `on_date`, then grouped into four tiers evaluated in this
    /// fixed order:
    ///
    /// 1. company matches and state matches
    /// 2. state matches and company is unset
    /// 3. company matches and state is unset
    /// 4. both unset (global default)
    ///
    /// Within a tier, rows sort by ascending priority, then descending
    /// `effective_from`, then descending id (most recently created wins).
    /// Returns an empty list when no row matches any tier; callers treat
    /// that as "statutory type inapplicable", not as an error.
    pub fn resolve(
        &self,
        statutory_type: StatutoryType,
        company_id: Uuid,
        state: &str,
        on_date: NaiveDate,
    ) -> Vec<&StatutoryConfig> {
        let candidates: Vec<&StatutoryConfig> = self
            .configs
            .iter()
            .filter(|c| c.statutory_type() == statutory_type && c.is_effective_on(on_date))
            .collect();

        let mut resolved = Vec::new();
        for tier in [
            Tier::CompanyAndState,
            Tier::StateOnly,
            Tier::CompanyOnly,
            Tier::Global,
        ] {
            let mut matches: Vec<&StatutoryConfig> = candidates
                .iter()
                .copied()
                .filter(|c| tier.matches(c, company_id, state))
                .collect();
            matches.sort_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then(b.effective_from.cmp(&a.effective_from))
                    .then(b.id.cmp(&a.id))
            });
            resolved.extend(matches);
        }
        resolved
    }

    /// Resolves the single active rule for a scope and date, if any.
    pub fn resolve_active(
        &self,
        statutory_type: StatutoryType,
        company_id: Uuid,
        state: &str,
        on_date: NaiveDate,
    ) -> Option<&StatutoryConfig> {
        self.resolve(statutory_type, company_id, state, on_date)
            .into_iter()
            .next()
    }
}

#[derive(Debug, Clone, Copy)]
enum Tier {
    CompanyAndState,
    StateOnly,
    CompanyOnly,
    Global,
}

impl Tier {
    fn matches(self, config: &StatutoryConfig, company_id: Uuid, state: &str) -> bool {
        let company_match = config.company_id == Some(company_id);
        let state_match = config.state.as_deref() == Some(state);
        match self {
            Tier::CompanyAndState => company_match && state_match,
            Tier::StateOnly => state_match && config.company_id.is_none(),
            Tier::CompanyOnly => company_match && config.state.is_none(),
            Tier::Global => config.company_id.is_none() && config.state.is_none(),
        }
    }
}
