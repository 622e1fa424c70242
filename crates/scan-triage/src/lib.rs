//! Priority triage for imaging scan worklists.
//!
//! Seed data is loaded once at startup, every scan is enriched with a
//! rule-based priority, and the HTTP router serves the sorted worklist.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod triage;
