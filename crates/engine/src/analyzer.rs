//! Pattern analysis over raw tenant records.
//!
//! Everything here is a pure, synchronous function of its input record
//! sets (plus the analysis timestamp). Malformed or missing fields were
//! already resolved to defaults at the record boundary, so analysis
//! never fails: a domain with no usable sample degrades to
//! [`DomainPattern::Empty`] instead of aborting the snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use adaptive_core::config::AnalysisConfig;
use adaptive_core::{
    ClientRecord, InvestmentQueryRecord, RiskProfile, UploadedFileRecord, WorkflowRecord,
    WorkflowStatus,
};

use crate::provider::TenantRecords;
use crate::snapshot::{
    AlertSeverity, ClientPatterns, DataPatterns, DistributionSummary, DomainPattern,
    InvestmentPatterns, ObservedThreshold, RiskAlert, RiskPatterns, SegmentStats,
    TenantPatternSnapshot, WorkflowPatterns,
};
use crate::thresholds;

/// Conservative clients above this amount are incompatible with their profile.
const CONSERVATIVE_MAX_INVESTMENT: f64 = 500_000.0;
/// Aggressive clients below this amount are incompatible with their profile.
const AGGRESSIVE_MIN_INVESTMENT: f64 = 50_000.0;
/// Aggressive clients above this age are incompatible with their profile.
const AGGRESSIVE_MAX_AGE: i32 = 65;
/// Conservative clients above this amount trigger a risk-mismatch alert.
const CONSERVATIVE_ALERT_INVESTMENT: f64 = 300_000.0;

// ── Entry point ─────────────────────────────────────────────────────

/// Run one full analysis pass. Deterministic apart from the timestamp.
pub fn analyze(
    tenant_id: &str,
    records: &TenantRecords,
    config: &AnalysisConfig,
) -> TenantPatternSnapshot {
    analyze_at(tenant_id, records, config, Utc::now())
}

/// Analysis pass with an explicit timestamp; `generated_at` and every
/// `adapted_at` stamp inside the snapshot carry this value.
pub fn analyze_at(
    tenant_id: &str,
    records: &TenantRecords,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> TenantPatternSnapshot {
    TenantPatternSnapshot {
        tenant_id: tenant_id.to_string(),
        generated_at: now,
        client_patterns: client_patterns(&records.clients),
        investment_patterns: investment_patterns(&records.clients),
        risk_patterns: risk_patterns(&records.clients, now),
        workflow_patterns: workflow_patterns(&records.workflows, config),
        data_patterns: data_patterns(&records.investment_queries, &records.files),
    }
}

// ── Distribution summary ────────────────────────────────────────────

/// Summarize the strictly positive amounts of a sample.
///
/// Quartiles and the median are exact index selections on the
/// ascending-sorted sample (`⌊0.25n⌋`, `⌊0.75n⌋`, `⌊n/2⌋`), never
/// interpolated. An empty or all-zero sample yields `Empty`.
pub fn summarize(amounts: &[f64]) -> DomainPattern<DistributionSummary> {
    let mut sample: Vec<f64> = amounts.iter().copied().filter(|a| *a > 0.0).collect();
    if sample.is_empty() {
        return DomainPattern::Empty;
    }
    sample.sort_by(f64::total_cmp);

    let n = sample.len();
    let mean = sample.iter().sum::<f64>() / n as f64;
    let median = sample[n / 2];
    let q1 = sample[(n as f64 * 0.25).floor() as usize];
    let q3 = sample[(n as f64 * 0.75).floor() as usize];
    let iqr = q3 - q1;

    DomainPattern::Ready(DistributionSummary {
        count: n,
        mean,
        median,
        q1,
        q3,
        outlier_threshold: q3 + 1.5 * iqr,
    })
}

// ── Client patterns ─────────────────────────────────────────────────

fn client_patterns(clients: &[ClientRecord]) -> DomainPattern<ClientPatterns> {
    if clients.is_empty() {
        return DomainPattern::Empty;
    }

    let mut risk_distribution: BTreeMap<RiskProfile, usize> = BTreeMap::new();
    for client in clients {
        *risk_distribution.entry(client.risk_profile).or_default() += 1;
    }

    let amounts: Vec<f64> = clients.iter().map(|c| c.investment_amount).collect();
    let investment = summarize(&amounts);
    let avg_investment = investment.as_ready().map(|d| d.mean).unwrap_or(0.0);

    let suggested_kpis = suggest_client_kpis(clients.len(), &risk_distribution, avg_investment);

    DomainPattern::Ready(ClientPatterns {
        total_clients: clients.len(),
        risk_distribution,
        investment,
        suggested_kpis,
    })
}

fn suggest_client_kpis(
    total_clients: usize,
    risk_distribution: &BTreeMap<RiskProfile, usize>,
    avg_investment: f64,
) -> Vec<String> {
    let mut suggestions = vec!["total_clients".to_string()];

    if total_clients > 100 {
        suggestions.push("client_growth_rate".to_string());
        suggestions.push("client_retention_rate".to_string());
    }

    if avg_investment > 100_000.0 {
        suggestions.push("avg_ticket".to_string());
        suggestions.push("high_value_clients".to_string());
    }

    let aggressive = risk_distribution
        .get(&RiskProfile::Aggressive)
        .copied()
        .unwrap_or(0);
    if aggressive as f64 > total_clients as f64 * 0.3 {
        suggestions.push("risk_concentration".to_string());
        suggestions.push("aggressive_portfolio_size".to_string());
    }

    suggestions
}

// ── Investment patterns ─────────────────────────────────────────────

fn investment_patterns(clients: &[ClientRecord]) -> DomainPattern<InvestmentPatterns> {
    let mut segments: BTreeMap<RiskProfile, Vec<f64>> = BTreeMap::new();
    for client in clients {
        if client.investment_amount > 0.0 {
            segments
                .entry(client.risk_profile)
                .or_default()
                .push(client.investment_amount);
        }
    }

    if segments.is_empty() {
        return DomainPattern::Empty;
    }

    let mut risk_analysis: BTreeMap<RiskProfile, SegmentStats> = BTreeMap::new();
    let mut total_investments = 0;
    for (risk, amounts) in &segments {
        total_investments += amounts.len();
        let sum: f64 = amounts.iter().sum();
        let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
        let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        risk_analysis.insert(
            *risk,
            SegmentStats {
                count: amounts.len(),
                avg: sum / amounts.len() as f64,
                min,
                max,
            },
        );
    }

    let suggested_thresholds = thresholds::synthesize(&risk_analysis);
    let adaptive_rules = thresholds::generate_rules(&risk_analysis);

    DomainPattern::Ready(InvestmentPatterns {
        total_investments,
        risk_analysis,
        suggested_thresholds,
        adaptive_rules,
    })
}

// ── Risk patterns ───────────────────────────────────────────────────

/// Approximate age as a plain year difference; 0 when the birth date is
/// absent.
fn approximate_age(birth_date: Option<chrono::NaiveDate>, now: DateTime<Utc>) -> i32 {
    birth_date
        .map(|d| now.year() - d.year())
        .unwrap_or(0)
}

fn is_incompatible(risk: RiskProfile, investment: f64, age: i32) -> bool {
    match risk {
        RiskProfile::Conservative => investment > CONSERVATIVE_MAX_INVESTMENT,
        RiskProfile::Aggressive => investment < AGGRESSIVE_MIN_INVESTMENT || age > AGGRESSIVE_MAX_AGE,
        RiskProfile::Moderate => false,
    }
}

fn risk_patterns(clients: &[ClientRecord], now: DateTime<Utc>) -> RiskPatterns {
    let incompatibilities = clients
        .iter()
        .filter(|c| {
            is_incompatible(
                c.risk_profile,
                c.investment_amount,
                approximate_age(c.birth_date, now),
            )
        })
        .count();

    let mut risk_alerts = Vec::new();
    let conservative_high = clients
        .iter()
        .filter(|c| {
            c.risk_profile == RiskProfile::Conservative
                && c.investment_amount > CONSERVATIVE_ALERT_INVESTMENT
        })
        .count();
    if conservative_high > 0 {
        risk_alerts.push(RiskAlert {
            kind: "risk_mismatch".to_string(),
            severity: AlertSeverity::Medium,
            count: conservative_high,
            message: format!("{conservative_high} conservative clients with high investments"),
            adaptive: true,
        });
    }

    let mut adaptive_thresholds = BTreeMap::new();
    for risk in RiskProfile::ALL {
        let amounts: Vec<f64> = clients
            .iter()
            .filter(|c| c.risk_profile == risk && c.investment_amount > 0.0)
            .map(|c| c.investment_amount)
            .collect();
        if amounts.is_empty() {
            continue;
        }
        let avg = amounts.iter().sum::<f64>() / amounts.len() as f64;
        let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        adaptive_thresholds.insert(
            risk,
            ObservedThreshold {
                warning_threshold: (avg * 1.5).floor(),
                alert_threshold: (avg * 2.0).floor(),
                max_observed: max,
                adapted_at: now,
            },
        );
    }

    RiskPatterns {
        total_risk_profiles: clients.len(),
        incompatibilities,
        risk_alerts,
        adaptive_thresholds,
    }
}

// ── Workflow patterns ───────────────────────────────────────────────

fn workflow_patterns(workflows: &[WorkflowRecord], config: &AnalysisConfig) -> WorkflowPatterns {
    let total_workflows = workflows.len();
    let active_workflows = workflows
        .iter()
        .filter(|w| w.status == WorkflowStatus::Active)
        .count();

    // Division guarded: an empty list averages to 0.0.
    let avg_executions = if workflows.is_empty() {
        0.0
    } else {
        workflows.iter().map(|w| w.execution_count as f64).sum::<f64>() / total_workflows as f64
    };

    let mut suggested_optimizations = Vec::new();
    let low_execution = workflows
        .iter()
        .filter(|w| w.execution_count < config.underperformer_executions)
        .count();
    if low_execution > 0 {
        suggested_optimizations.push(format!(
            "{low_execution} workflows with low execution count - consider reviewing"
        ));
    }
    let inactive = workflows
        .iter()
        .filter(|w| w.status != WorkflowStatus::Active)
        .count();
    if inactive > 0 {
        suggested_optimizations.push(format!(
            "{inactive} inactive workflows - consider activating or removing"
        ));
    }

    WorkflowPatterns {
        total_workflows,
        active_workflows,
        avg_executions,
        suggested_optimizations,
    }
}

// ── Data-usage patterns ─────────────────────────────────────────────

fn file_extension(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or(name).to_lowercase();
    if ext.is_empty() {
        "unknown".to_string()
    } else {
        ext
    }
}

fn data_patterns(queries: &[InvestmentQueryRecord], files: &[UploadedFileRecord]) -> DataPatterns {
    let mut query_types: BTreeMap<String, usize> = BTreeMap::new();
    for query in queries {
        let kind = query
            .connection_type
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        *query_types.entry(kind).or_default() += 1;
    }

    let mut file_types: BTreeMap<String, usize> = BTreeMap::new();
    for file in files {
        *file_types.entry(file_extension(&file.original_name)).or_default() += 1;
    }

    let mut suggested_connections = Vec::new();
    if files
        .iter()
        .any(|f| f.original_name.to_lowercase().contains(".csv"))
    {
        suggested_connections.push("consider configuring automatic CSV import".to_string());
    }
    let database_queries = query_types.get("database").copied().unwrap_or(0);
    if database_queries > 3 {
        suggested_connections
            .push("multiple database queries - consider optimizing with views".to_string());
    }

    DataPatterns {
        total_queries: queries.len(),
        total_files: files.len(),
        query_types,
        file_types,
        suggested_connections,
    }
}

// ── Tests ───────────────────────────────────────────────────────────
