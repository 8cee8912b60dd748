//! Pattern snapshot model.
//!
//! A [`TenantPatternSnapshot`] is the immutable result of one full
//! analysis pass for a tenant. Domains that had no usable sample are
//! marked [`DomainPattern::Empty`] rather than carrying zeroed-out
//! numbers, so consumers can tell "no data" apart from "zero value".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adaptive_core::{RiskProfile, TenantId};

use crate::thresholds::{AdaptiveRule, AdaptiveThreshold};

// ── Domain pattern marker ───────────────────────────────────────────

/// Per-domain analysis result: either a computed pattern or an explicit
/// empty marker for domains whose filtered sample had no elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum DomainPattern<T> {
    /// No usable sample for this domain. Downstream derivations skip it.
    Empty,
    Ready(T),
}

impl<T> DomainPattern<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, DomainPattern::Empty)
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            DomainPattern::Empty => None,
            DomainPattern::Ready(t) => Some(t),
        }
    }
}

// ── Distribution summary ────────────────────────────────────────────

/// Descriptive statistics over a sorted positive sample.
///
/// Quartiles use exact index selection (`⌊0.25n⌋`, `⌊0.75n⌋`, `⌊n/2⌋`),
/// never interpolation. The outlier threshold is the IQR cutoff
/// `q3 + 1.5·(q3 − q1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub outlier_threshold: f64,
}

// ── Client patterns ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPatterns {
    pub total_clients: usize,
    /// Clients per risk profile; records without a profile count as moderate.
    pub risk_distribution: BTreeMap<RiskProfile, usize>,
    /// Distribution over strictly positive investment amounts.
    pub investment: DomainPattern<DistributionSummary>,
    /// KPI names suggested from the observed client base.
    pub suggested_kpis: Vec<String>,
}

// ── Investment patterns ─────────────────────────────────────────────

/// Per-risk-segment statistics over positive investment amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub count: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPatterns {
    pub total_investments: usize,
    pub risk_analysis: BTreeMap<RiskProfile, SegmentStats>,
    pub suggested_thresholds: BTreeMap<RiskProfile, AdaptiveThreshold>,
    pub adaptive_rules: Vec<AdaptiveRule>,
}

// ── Risk patterns ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// A pattern-derived alert over a group of clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: AlertSeverity,
    pub count: usize,
    pub message: String,
    pub adaptive: bool,
}

/// Thresholds observed from a segment's own history, stamped with the
/// analysis time they were adapted at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedThreshold {
    pub warning_threshold: f64,
    pub alert_threshold: f64,
    pub max_observed: f64,
    pub adapted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPatterns {
    pub total_risk_profiles: usize,
    /// Clients whose profile is incompatible with their investment or age.
    pub incompatibilities: usize,
    pub risk_alerts: Vec<RiskAlert>,
    pub adaptive_thresholds: BTreeMap<RiskProfile, ObservedThreshold>,
}

// ── Workflow patterns ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPatterns {
    pub total_workflows: usize,
    pub active_workflows: usize,
    /// Average execution count across all workflows; 0.0 for an empty list.
    pub avg_executions: f64,
    pub suggested_optimizations: Vec<String>,
}

// ── Data-usage patterns ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPatterns {
    pub total_queries: usize,
    pub total_files: usize,
    /// Query count per connection type ("unknown" when untagged).
    pub query_types: BTreeMap<String, usize>,
    /// File count per lowercased extension ("unknown" when absent).
    pub file_types: BTreeMap<String, usize>,
    pub suggested_connections: Vec<String>,
}

// ── Snapshot ────────────────────────────────────────────────────────

/// The immutable result of one full pattern-analysis pass for a tenant.
/// A fresh analysis produces a wholly new value; fields are never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantPatternSnapshot {
    pub tenant_id: TenantId,
    pub generated_at: DateTime<Utc>,
    pub client_patterns: DomainPattern<ClientPatterns>,
    pub investment_patterns: DomainPattern<InvestmentPatterns>,
    pub risk_patterns: RiskPatterns,
    pub workflow_patterns: WorkflowPatterns,
    pub data_patterns: DataPatterns,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_marker_serializes_as_status() {
        let p: DomainPattern<DistributionSummary> = DomainPattern::Empty;
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "empty" }));
    }

    #[test]
    fn ready_pattern_round_trips() {
        let p = DomainPattern::Ready(DistributionSummary {
            count: 3,
            mean: 210_000.0,
            median: 20_000.0,
            q1: 10_000.0,
            q3: 600_000.0,
            outlier_threshold: 1_485_000.0,
        });
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["data"]["count"], 3);

        let back: DomainPattern<DistributionSummary> = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn as_ready_on_empty_is_none() {
        let p: DomainPattern<ClientPatterns> = DomainPattern::Empty;
        assert!(p.is_empty());
        assert!(p.as_ready().is_none());
    }
}
