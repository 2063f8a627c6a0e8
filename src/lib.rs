//! Payroll Run & Statutory Compliance Calculation Engine.
//!
//! This crate computes monthly payroll runs for a workforce and derives
//! statutory deductions and contributions (provident fund, employee state
//! insurance, professional tax, labour welfare fund) from effective-dated,
//! scope-resolved regulatory configuration.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
