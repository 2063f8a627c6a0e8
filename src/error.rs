//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing pay runs and
//! computing statutory compliance.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::config::StatutoryType;
use crate::models::RunStatus;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use uuid::Uuid;
///
/// let error = EngineError::RunNotFound { run_id: Uuid::nil() };
/// assert_eq!(
///     error.to_string(),
///     "Pay run not found: 00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse or validation error.
        message: String,
    },

    /// A request was malformed before any state was touched.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field or concept that was invalid.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// The referenced pay run does not exist.
    #[error("Pay run not found: {run_id}")]
    RunNotFound {
        /// The id that was looked up.
        run_id: Uuid,
    },

    /// An operation was attempted from a status that does not permit it.
    #[error(
        "Cannot {operation} a pay run in status '{current}'; allowed from: {}",
        allowed.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    )]
    StateConflict {
        /// The operation that was refused.
        operation: &'static str,
        /// The run's current status.
        current: RunStatus,
        /// The statuses the operation is allowed from.
        allowed: Vec<RunStatus>,
    },

    /// No pay policy is resolvable for the company on the requested date.
    #[error("No pay policy in effect for company {company_id} on {date}")]
    NoPayPolicy {
        /// The company whose policy was requested.
        company_id: Uuid,
        /// The date the policy was requested for.
        date: NaiveDate,
    },

    /// No employee pay profiles are effective for the calculation window.
    #[error("No employees to calculate for company {company_id} on {date}")]
    NoEmployees {
        /// The company the run belongs to.
        company_id: Uuid,
        /// The date profiles were resolved for.
        date: NaiveDate,
    },

    /// A trade category referenced by a daily-wage profile could not be resolved.
    #[error("Trade category '{code}' has no rate effective on {date}")]
    TradeRateNotFound {
        /// The trade category code.
        code: String,
        /// The date the rate was requested for.
        date: NaiveDate,
    },

    /// Two effective-dated pay profiles for the same employee overlap.
    #[error("Pay profile for employee {employee_id} overlaps an existing profile")]
    ProfileOverlap {
        /// The employee whose profile was rejected.
        employee_id: Uuid,
    },

    /// Compliance apply was requested while statutory configuration is missing.
    #[error(
        "Missing statutory configuration for: {}",
        missing.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    )]
    MissingStatutoryConfig {
        /// The statutory types that could not be resolved.
        missing: Vec<StatutoryType>,
    },

    /// The attendance gateway failed; calculation aborts rather than
    /// proceeding with partial data.
    #[error("Attendance rollup unavailable: {message}")]
    AttendanceUnavailable {
        /// A description of the gateway failure.
        message: String,
    },

    /// Shared state was poisoned or otherwise unusable.
    #[error("Internal engine error: {message}")]
    Internal {
        /// A description of the internal failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
