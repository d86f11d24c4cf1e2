//! Payroll rules engine for Indian salary structures
//!
//! This crate evaluates compensation templates into salary annexures,
//! compares income tax under the old and new regimes, and counts and
//! validates leave against a company leave policy.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
