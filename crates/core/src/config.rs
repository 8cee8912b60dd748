use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

/// Engine tuning knobs. Defaults match the calibrated production values;
/// the statistical constants (IQR multiplier, quartile indexing, threshold
/// multipliers, incompatibility cutoffs) are fixed and not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub analysis: AnalysisConfig,
    pub realtime: RealtimeConfig,
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            analysis: AnalysisConfig::from_env(),
            realtime: RealtimeConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  analysis:  underperformer_executions={}, kpi_deviation_alert_pct={}",
            self.analysis.underperformer_executions,
            self.analysis.kpi_deviation_alert_pct
        );
        tracing::info!(
            "  realtime:  rebalance_deviation_pct={}, review_delta={}, slow_execution_ms={}",
            self.realtime.rebalance_deviation_pct,
            self.realtime.review_delta,
            self.realtime.slow_execution_ms
        );
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            realtime: RealtimeConfig::default(),
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Workflows below this execution count are flagged as underperformers.
    pub underperformer_executions: u64,
    /// Deviation band (percent) for the Average Ticket KPI alert.
    pub kpi_deviation_alert_pct: f64,
}

impl AnalysisConfig {
    fn from_env() -> Self {
        Self {
            underperformer_executions: env_u64("UNDERPERFORMER_EXECUTIONS", 5),
            kpi_deviation_alert_pct: env_f64("KPI_DEVIATION_ALERT_PCT", 20.0),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            underperformer_executions: 5,
            kpi_deviation_alert_pct: 20.0,
        }
    }
}

// ── Realtime scoring ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Risk-split deviation (percentage points) above which rebalancing is suggested.
    pub rebalance_deviation_pct: f64,
    /// Absolute investment change above which a review is required.
    pub review_delta: f64,
    /// Workflow execution time (ms) above which optimizations are suggested.
    pub slow_execution_ms: u64,
}

impl RealtimeConfig {
    fn from_env() -> Self {
        Self {
            rebalance_deviation_pct: env_f64("REBALANCE_DEVIATION_PCT", 15.0),
            review_delta: env_f64("REVIEW_DELTA", 100_000.0),
            slow_execution_ms: env_u64("SLOW_EXECUTION_MS", 30_000),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            rebalance_deviation_pct: 15.0,
            review_delta: 100_000.0,
            slow_execution_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibrated_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.realtime.rebalance_deviation_pct, 15.0);
        assert_eq!(cfg.realtime.review_delta, 100_000.0);
        assert_eq!(cfg.realtime.slow_execution_ms, 30_000);
        assert_eq!(cfg.analysis.underperformer_executions, 5);
        assert_eq!(cfg.analysis.kpi_deviation_alert_pct, 20.0);
    }
}
