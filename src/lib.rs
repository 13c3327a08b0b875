//! Store metrics report service
//!
//! Aggregates per-store operating and promotion metrics from MySQL over one or
//! two date ranges and renders them into multi-sheet `.xlsx` reports, served
//! through a small actix-web API.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::metrics;
pub use modules::reports;
pub use modules::stores;
