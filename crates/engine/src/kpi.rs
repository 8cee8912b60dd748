//! Conditional KPI generation.
//!
//! Each KPI definition is gated by a precondition over the snapshot, so
//! tenants only receive KPIs their data can actually back. Generation is
//! idempotent: the same snapshot always yields structurally identical
//! definitions.

use serde::{Deserialize, Serialize};

use adaptive_core::config::AnalysisConfig;

use crate::snapshot::TenantPatternSnapshot;

// ── KPI model ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KpiKind {
    Metric,
    Chart { chart_type: ChartType },
}

/// Adaptive-recalculation metadata embedded in a KPI definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiAdaptivePolicy {
    Recalculate {
        auto_adjust: bool,
        recalculate_frequency: String,
        alert_if_deviation_over_pct: f64,
    },
    RiskMonitor {
        alert_if_imbalanced: bool,
        suggest_rebalancing: bool,
        monitor_incompatibilities: bool,
    },
    WorkflowMonitor {
        identify_underperformers: bool,
        suggest_optimizations: bool,
        /// Never disable a workflow without confirmation.
        auto_disable_unused: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: KpiKind,
    /// Underlying query template, bound by the route layer.
    pub query: String,
    pub threshold: Option<f64>,
    pub adaptive_rules: KpiAdaptivePolicy,
}

// ── Generation ──────────────────────────────────────────────────────

/// Generate all KPIs whose preconditions the snapshot satisfies.
pub fn generate(snapshot: &TenantPatternSnapshot, config: &AnalysisConfig) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    // Average Ticket: requires a positive average investment.
    let avg_investment = snapshot
        .client_patterns
        .as_ready()
        .and_then(|p| p.investment.as_ready())
        .map(|d| d.mean)
        .unwrap_or(0.0);
    if avg_investment > 0.0 {
        kpis.push(KpiDefinition {
            name: "Average Ticket".to_string(),
            kind: KpiKind::Metric,
            query: "SELECT AVG(investment_amount) AS avg_ticket FROM clients WHERE tenant_id = ?"
                .to_string(),
            threshold: Some(avg_investment),
            adaptive_rules: KpiAdaptivePolicy::Recalculate {
                auto_adjust: true,
                recalculate_frequency: "weekly".to_string(),
                alert_if_deviation_over_pct: config.kpi_deviation_alert_pct,
            },
        });
    }

    // Risk Distribution: requires at least one recorded risk profile.
    if snapshot.risk_patterns.total_risk_profiles > 0 {
        kpis.push(KpiDefinition {
            name: "Risk Distribution".to_string(),
            kind: KpiKind::Chart {
                chart_type: ChartType::Pie,
            },
            query: "SELECT risk_profile, COUNT(*) AS count FROM clients WHERE tenant_id = ? \
                    GROUP BY risk_profile"
                .to_string(),
            threshold: None,
            adaptive_rules: KpiAdaptivePolicy::RiskMonitor {
                alert_if_imbalanced: true,
                suggest_rebalancing: true,
                monitor_incompatibilities: true,
            },
        });
    }

    // Workflow Performance: requires at least one workflow.
    if snapshot.workflow_patterns.total_workflows > 0 {
        kpis.push(KpiDefinition {
            name: "Workflow Performance".to_string(),
            kind: KpiKind::Chart {
                chart_type: ChartType::Bar,
            },
            query: "SELECT name, execution_count FROM workflows WHERE tenant_id = ?".to_string(),
            threshold: None,
            adaptive_rules: KpiAdaptivePolicy::WorkflowMonitor {
                identify_underperformers: true,
                suggest_optimizations: true,
                auto_disable_unused: false,
            },
        });
    }

    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use adaptive_core::RiskProfile;

    use crate::analyzer::analyze_at;
    use crate::provider::TenantRecords;

    use adaptive_core::{ClientRecord, WorkflowRecord, WorkflowStatus};
    use uuid::Uuid;

    fn snapshot_for(records: &TenantRecords) -> TenantPatternSnapshot {
        analyze_at(
            "t1",
            records,
            &AnalysisConfig::default(),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    fn client(risk: RiskProfile, amount: f64) -> ClientRecord {
        ClientRecord {
            risk_profile: risk,
            investment_amount: amount,
            ..Default::default()
        }
    }

    #[test]
    fn empty_tenant_generates_no_kpis() {
        let snapshot = snapshot_for(&TenantRecords::default());
        assert!(generate(&snapshot, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn zero_average_investment_suppresses_average_ticket() {
        // Clients exist but none invested: risk KPI only.
        let records = TenantRecords {
            clients: vec![client(RiskProfile::Moderate, 0.0)],
            ..Default::default()
        };
        let kpis = generate(&snapshot_for(&records), &AnalysisConfig::default());

        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].name, "Risk Distribution");
        assert_eq!(
            kpis[0].kind,
            KpiKind::Chart {
                chart_type: ChartType::Pie
            }
        );
    }

    #[test]
    fn full_tenant_generates_all_three() {
        let records = TenantRecords {
            clients: vec![client(RiskProfile::Moderate, 50_000.0)],
            workflows: vec![WorkflowRecord {
                id: Uuid::new_v4(),
                name: "billing".to_string(),
                status: WorkflowStatus::Active,
                execution_count: 12,
            }],
            ..Default::default()
        };
        let kpis = generate(&snapshot_for(&records), &AnalysisConfig::default());

        let names: Vec<&str> = kpis.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(
            names,
            ["Average Ticket", "Risk Distribution", "Workflow Performance"]
        );

        let ticket = &kpis[0];
        assert_eq!(ticket.kind, KpiKind::Metric);
        assert_eq!(ticket.threshold, Some(50_000.0));
        assert_eq!(
            ticket.adaptive_rules,
            KpiAdaptivePolicy::Recalculate {
                auto_adjust: true,
                recalculate_frequency: "weekly".to_string(),
                alert_if_deviation_over_pct: 20.0,
            }
        );
    }

    #[test]
    fn generation_is_idempotent_for_a_snapshot() {
        let records = TenantRecords {
            clients: vec![
                client(RiskProfile::Conservative, 120_000.0),
                client(RiskProfile::Aggressive, 90_000.0),
            ],
            ..Default::default()
        };
        let snapshot = snapshot_for(&records);

        let first = generate(&snapshot, &AnalysisConfig::default());
        let second = generate(&snapshot, &AnalysisConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn kpi_kind_serializes_with_type_tag() {
        let json = serde_json::to_value(KpiKind::Chart {
            chart_type: ChartType::Pie,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "type": "chart", "chart_type": "pie" }));
    }
}
