//! Adaptive pattern & rule engine.
//!
//! This crate provides:
//! - Concurrent per-tenant data collection behind a provider trait
//! - Statistical pattern analysis (distributions, quartiles, outlier cutoffs)
//! - Adaptive threshold and declarative rule synthesis per risk segment
//! - Conditional KPI generation with recalculation metadata
//! - A versioned per-tenant snapshot store (last write wins)
//! - Real-time impact scoring of incoming events against the last snapshot

pub mod analyzer;
pub mod cache;
pub mod collector;
pub mod engine;
pub mod kpi;
pub mod provider;
pub mod realtime;
pub mod snapshot;
pub mod thresholds;

pub use engine::AdaptiveEngine;
