//! The `AdaptiveEngine` facade.
//!
//! Wires the collector, analyzer, KPI generator, snapshot store, and
//! real-time evaluator together and exposes the four operations the
//! route layer calls. Analysis-driven operations always fetch and
//! analyze fresh; only real-time scoring reads the stored snapshot.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use adaptive_core::{EngineConfig, EngineResult, RiskProfile, TenantId};

use crate::analyzer;
use crate::cache::SnapshotStore;
use crate::collector::DataCollector;
use crate::kpi::{self, KpiDefinition};
use crate::provider::TenantDataProvider;
use crate::realtime::{RealtimeAnalysis, RealtimeImpactEvaluator};
use crate::snapshot::TenantPatternSnapshot;
use crate::thresholds::{AdaptiveRule, AdaptiveThreshold};

// ── Adaptation report ───────────────────────────────────────────────

/// One applied adaptation, tagged the way the route layer serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adaptation {
    ThresholdAdjustment {
        data: std::collections::BTreeMap<RiskProfile, AdaptiveThreshold>,
        applied: bool,
    },
    KpiGeneration {
        count: usize,
        kpis: Vec<KpiDefinition>,
    },
    WorkflowRules {
        rules: Vec<AdaptiveRule>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationReport {
    pub tenant_id: TenantId,
    pub adaptations_count: usize,
    pub adaptations: Vec<Adaptation>,
    pub timestamp: DateTime<Utc>,
}

// ── Engine ──────────────────────────────────────────────────────────

pub struct AdaptiveEngine {
    collector: DataCollector,
    store: Arc<dyn SnapshotStore>,
    evaluator: RealtimeImpactEvaluator,
    config: EngineConfig,
}

impl AdaptiveEngine {
    pub fn new(
        provider: Arc<dyn TenantDataProvider>,
        store: Arc<dyn SnapshotStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            collector: DataCollector::new(provider),
            evaluator: RealtimeImpactEvaluator::new(store.clone(), config.realtime.clone()),
            store,
            config,
        }
    }

    /// Fetch the tenant's four record sets concurrently, analyze them,
    /// and overwrite the stored snapshot. Pure in its inputs: identical
    /// record sets yield identical snapshots apart from the timestamp.
    pub async fn analyze_data_patterns(
        &self,
        tenant_id: &str,
    ) -> EngineResult<TenantPatternSnapshot> {
        let started = Instant::now();
        let records = self.collector.fetch(tenant_id).await?;
        let snapshot = analyzer::analyze(tenant_id, &records, &self.config.analysis);
        let version = self.store.put(tenant_id, snapshot.clone()).await?;

        info!(
            tenant = tenant_id,
            version,
            clients = records.clients.len(),
            workflows = records.workflows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pattern analysis complete"
        );
        Ok(snapshot)
    }

    /// Generate KPI definitions from a fresh analysis. Never trusts the
    /// stored snapshot.
    pub async fn generate_adaptive_kpis(&self, tenant_id: &str) -> EngineResult<Vec<KpiDefinition>> {
        let snapshot = self.analyze_data_patterns(tenant_id).await?;
        let kpis = kpi::generate(&snapshot, &self.config.analysis);
        info!(tenant = tenant_id, kpis = kpis.len(), "adaptive KPIs generated");
        Ok(kpis)
    }

    /// Run a fresh analysis and report every adaptation it drives:
    /// threshold adjustments, KPI generation, and workflow rules. Empty
    /// domains contribute no entries.
    pub async fn execute_adaptations(&self, tenant_id: &str) -> EngineResult<AdaptationReport> {
        let snapshot = self.analyze_data_patterns(tenant_id).await?;
        let mut adaptations = Vec::new();

        if let Some(investment) = snapshot.investment_patterns.as_ready() {
            adaptations.push(Adaptation::ThresholdAdjustment {
                data: investment.suggested_thresholds.clone(),
                applied: true,
            });
        }

        let kpis = kpi::generate(&snapshot, &self.config.analysis);
        if !kpis.is_empty() {
            adaptations.push(Adaptation::KpiGeneration {
                count: kpis.len(),
                kpis,
            });
        }

        if let Some(investment) = snapshot.investment_patterns.as_ready() {
            if !investment.adaptive_rules.is_empty() {
                adaptations.push(Adaptation::WorkflowRules {
                    rules: investment.adaptive_rules.clone(),
                });
            }
        }

        info!(
            tenant = tenant_id,
            adaptations = adaptations.len(),
            "adaptations executed"
        );

        Ok(AdaptationReport {
            tenant_id: tenant_id.to_string(),
            adaptations_count: adaptations.len(),
            adaptations,
            timestamp: snapshot.generated_at,
        })
    }

    /// Score a single incoming event against the stored snapshot.
    pub async fn perform_realtime_analysis(
        &self,
        tenant_id: &str,
        event_type: &str,
        payload: serde_json::Value,
    ) -> EngineResult<RealtimeAnalysis> {
        self.evaluator.evaluate(tenant_id, event_type, payload).await
    }
}
