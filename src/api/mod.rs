//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for managing pay runs:
//! creation, calculation, lifecycle transitions, statutory compliance
//! preview/apply and adjustment merging.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AdjustmentApplyRequest, ComplianceApplyRequest, CreateRunRequest};
pub use response::ApiError;
pub use state::AppState;
