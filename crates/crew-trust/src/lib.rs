//! Explainable scoring core for maritime crew candidates.
//!
//! Two pipelines share one layered configuration pattern: competency scoring over interview
//! answers and stability/risk scoring over a contract timeline. Neither pipeline makes a hiring
//! decision; both produce scores, flags and tiers for downstream review.

pub mod config;
pub mod telemetry;
pub mod workflows;
