//! Applicant eligibility screening built around a declarative rule engine.
//!
//! The crate is organized as a thin adapter over a logic-rule boundary: form
//! input becomes a set of facts, one query produces the verdict, and the facts
//! are retracted before the result leaves the adapter. The rule set itself is
//! configuration consulted once at startup.

pub mod config;
pub mod engine;
pub mod error;
pub mod screening;
pub mod telemetry;
