//! Real-time impact scoring.
//!
//! Scores a single incoming event against the tenant's last stored
//! snapshot. The evaluator never re-analyzes: a tenant with no stored
//! snapshot gets a structured "patterns not found" result, and an
//! unrecognized event type gets a structured "unsupported" result —
//! neither is an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use adaptive_core::config::RealtimeConfig;
use adaptive_core::{ClientRecord, EngineResult, RiskProfile, TenantId};

use crate::cache::SnapshotStore;

/// Ideal share of each risk segment under an even three-way split.
/// Hard-coded for exactly the three known risk categories; adding a
/// category invalidates this baseline.
pub const EVEN_SPLIT_PCT: f64 = 33.33;

// ── Event payloads ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvestmentChangeEvent {
    #[serde(default)]
    pub old_value: f64,
    #[serde(default)]
    pub new_value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowExecutionEvent {
    #[serde(default)]
    pub workflow_id: Option<Uuid>,
    #[serde(default)]
    pub execution_time_ms: u64,
    #[serde(default)]
    pub status: String,
}

// ── Assessment model ────────────────────────────────────────────────

/// Skew the new client introduces into the tenant's risk split,
/// measured against the fixed even-split baseline rather than the
/// tenant's own historical mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskImpact {
    pub risk_profile: RiskProfile,
    pub current_percentage: f64,
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentImpact {
    pub investment: f64,
    pub avg_investment: f64,
    pub deviation: f64,
    pub is_outlier: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub risk_impact: RiskImpact,
    pub investment_impact: InvestmentImpact,
    pub suggested_actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentChangeImpact {
    pub old_value: f64,
    pub new_value: f64,
    /// `None` when the old value was zero: the relative change is
    /// undefined and the event is flagged for manual review instead.
    pub percentage_change: Option<f64>,
    pub requires_review: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionImpact {
    pub workflow_id: Option<Uuid>,
    pub execution_time_ms: u64,
    pub success: bool,
    pub suggested_optimizations: Vec<String>,
}

/// Outcome of one real-time scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RealtimeAnalysis {
    NewClientImpact(ImpactAssessment),
    InvestmentChange(InvestmentChangeImpact),
    WorkflowExecution(WorkflowExecutionImpact),
    PatternsNotFound { tenant_id: TenantId },
    Unsupported { analysis_type: String },
}

// ── Evaluator ───────────────────────────────────────────────────────

pub struct RealtimeImpactEvaluator {
    store: Arc<dyn SnapshotStore>,
    config: RealtimeConfig,
}

impl RealtimeImpactEvaluator {
    pub fn new(store: Arc<dyn SnapshotStore>, config: RealtimeConfig) -> Self {
        Self { store, config }
    }

    /// Score one event. The boundary delivers the event type as a string
    /// and the payload as raw JSON; unknown types come back as
    /// `Unsupported`.
    pub async fn evaluate(
        &self,
        tenant_id: &str,
        event_type: &str,
        payload: serde_json::Value,
    ) -> EngineResult<RealtimeAnalysis> {
        debug!(tenant = tenant_id, event = event_type, "realtime analysis");

        match event_type {
            "new_client" => {
                let client: ClientRecord = serde_json::from_value(payload)?;
                self.new_client_impact(tenant_id, &client).await
            }
            "investment_change" => {
                let event: InvestmentChangeEvent = serde_json::from_value(payload)?;
                Ok(RealtimeAnalysis::InvestmentChange(
                    self.investment_change(&event),
                ))
            }
            "workflow_execution" => {
                let event: WorkflowExecutionEvent = serde_json::from_value(payload)?;
                Ok(RealtimeAnalysis::WorkflowExecution(
                    self.workflow_execution(event),
                ))
            }
            other => Ok(RealtimeAnalysis::Unsupported {
                analysis_type: other.to_string(),
            }),
        }
    }

    async fn new_client_impact(
        &self,
        tenant_id: &str,
        client: &ClientRecord,
    ) -> EngineResult<RealtimeAnalysis> {
        let Some(stored) = self.store.get(tenant_id).await? else {
            return Ok(RealtimeAnalysis::PatternsNotFound {
                tenant_id: tenant_id.to_string(),
            });
        };

        // A snapshot with no client baseline cannot score a client event.
        let Some(patterns) = stored.snapshot.client_patterns.as_ready() else {
            return Ok(RealtimeAnalysis::PatternsNotFound {
                tenant_id: tenant_id.to_string(),
            });
        };

        let segment_count = patterns
            .risk_distribution
            .get(&client.risk_profile)
            .copied()
            .unwrap_or(0);
        let current_percentage = segment_count as f64 / patterns.total_clients as f64 * 100.0;
        let risk_impact = RiskImpact {
            risk_profile: client.risk_profile,
            current_percentage,
            deviation: (EVEN_SPLIT_PCT - current_percentage).abs(),
        };

        let distribution = patterns.investment.as_ready();
        let avg_investment = distribution.map(|d| d.mean).unwrap_or(0.0);
        let is_outlier = distribution
            .map(|d| client.investment_amount > d.outlier_threshold)
            .unwrap_or(false);
        let investment_impact = InvestmentImpact {
            investment: client.investment_amount,
            avg_investment,
            deviation: (client.investment_amount - avg_investment).abs(),
            is_outlier,
        };

        let mut suggested_actions = Vec::new();
        if risk_impact.deviation > self.config.rebalance_deviation_pct {
            suggested_actions.push("consider rebalancing portfolio".to_string());
        }
        if investment_impact.is_outlier {
            suggested_actions.push("review investment profile".to_string());
        }

        Ok(RealtimeAnalysis::NewClientImpact(ImpactAssessment {
            risk_impact,
            investment_impact,
            suggested_actions,
        }))
    }

    fn investment_change(&self, event: &InvestmentChangeEvent) -> InvestmentChangeImpact {
        let delta = event.new_value - event.old_value;
        let (percentage_change, requires_review) = if event.old_value == 0.0 {
            // Relative change against zero is undefined: flag for review.
            (None, true)
        } else {
            (
                Some(delta / event.old_value * 100.0),
                delta.abs() > self.config.review_delta,
            )
        };

        InvestmentChangeImpact {
            old_value: event.old_value,
            new_value: event.new_value,
            percentage_change,
            requires_review,
        }
    }

    fn workflow_execution(&self, event: WorkflowExecutionEvent) -> WorkflowExecutionImpact {
        let suggested_optimizations = if event.execution_time_ms > self.config.slow_execution_ms {
            vec!["consider reducing step count or complexity".to_string()]
        } else {
            Vec::new()
        };

        WorkflowExecutionImpact {
            workflow_id: event.workflow_id,
            execution_time_ms: event.execution_time_ms,
            success: event.status == "completed",
            suggested_optimizations,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
