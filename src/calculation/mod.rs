//! Statutory calculators and gross pay math.
//!
//! Every calculator in this module is a pure function of a run item and a
//! resolved configuration payload: no hidden state, no side effects. Missing
//! or inapplicable configuration surfaces as an absent result block rather
//! than an error, so a compliance preview can report partial
//! missing-configuration state instead of failing outright.

mod gross;
mod professional_tax;
mod provident_fund;
mod state_insurance;
mod welfare_fund;

pub use gross::{DailyWageGross, MONTHLY_LOP_DIVISOR, daily_wage_gross, monthly_gross};
pub use professional_tax::{PtResult, calculate_pt};
pub use provident_fund::{PfResult, calculate_pf};
pub use state_insurance::{EsiResult, calculate_esi};
pub use welfare_fund::{LwfResult, calculate_lwf};
