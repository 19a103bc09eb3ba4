//! # Supply-chain KPI Analytics
//!
//! This crate turns the four planning extracts (demand, inventory, product
//! master and sales) into the KPI tables the planning team reviews every week.
//!
//! ## Architectural Principles
//!
//! - **Load once, compute many:** `AnalyticsEngine` owns the input tables for its
//!   lifetime. Every metric borrows them immutably, so running a metric twice
//!   gives the same answer.
//! - **Bad cells degrade, bad files fail:** an unparseable number becomes a
//!   missing value while the row is read; a missing or structurally broken file
//!   is an `AnalyticsError`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: loads the inputs and computes every metric.
//! - `Table`: an input table together with the columns its source provided.
//! - `report`: one row type per result file, plus the `RunSummary`.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
mod join;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use dataset::Table;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{RunSummary, WrittenFile};
