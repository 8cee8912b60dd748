//! Adaptive threshold and rule synthesis.
//!
//! For every risk segment observed in the investment data we derive
//! recommended bounds from the segment's own average/maximum, and emit
//! two declarative rules per segment. Rules are data, not code; they
//! are interpreted by the external workflow engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use adaptive_core::RiskProfile;

use crate::snapshot::SegmentStats;

// ── Thresholds ──────────────────────────────────────────────────────

/// Recommended investment bounds for one risk segment, derived from the
/// segment's observed distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThreshold {
    /// ⌊avg · 0.5⌋
    pub min_recommended: f64,
    /// ⌊avg · 2⌋
    pub max_recommended: f64,
    /// ⌊max · 0.9⌋
    pub alert_threshold: f64,
    /// ⌊avg · 1.5⌋
    pub review_threshold: f64,
}

/// Derive thresholds for every segment present in the analysis.
pub fn synthesize(
    risk_analysis: &BTreeMap<RiskProfile, SegmentStats>,
) -> BTreeMap<RiskProfile, AdaptiveThreshold> {
    risk_analysis
        .iter()
        .map(|(risk, stats)| {
            (
                *risk,
                AdaptiveThreshold {
                    min_recommended: (stats.avg * 0.5).floor(),
                    max_recommended: (stats.avg * 2.0).floor(),
                    alert_threshold: (stats.max * 0.9).floor(),
                    review_threshold: (stats.avg * 1.5).floor(),
                },
            )
        })
        .collect()
}

// ── Rules ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Gt,
    Lt,
}

/// Named effect a matching rule requests from the workflow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    RequireManagerApproval,
    SuggestRiskReview,
}

/// Declarative predicate over client record fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub risk_profile: RiskProfile,
    pub field: String,
    pub op: ComparisonOp,
    pub value: f64,
}

/// A generated condition/action pair. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRule {
    pub condition: RuleCondition,
    pub action: RuleAction,
    pub reason: String,
    pub adaptive: bool,
}

/// Generate the two standard rules for every segment present: one for
/// investments above the segment maximum, one for investments far below
/// the segment average.
pub fn generate_rules(risk_analysis: &BTreeMap<RiskProfile, SegmentStats>) -> Vec<AdaptiveRule> {
    let mut rules = Vec::with_capacity(risk_analysis.len() * 2);

    for (risk, stats) in risk_analysis {
        rules.push(AdaptiveRule {
            condition: RuleCondition {
                risk_profile: *risk,
                field: "investment_amount".to_string(),
                op: ComparisonOp::Gt,
                value: stats.max,
            },
            action: RuleAction::RequireManagerApproval,
            reason: format!("investment above the observed pattern for the {risk} profile"),
            adaptive: true,
        });

        rules.push(AdaptiveRule {
            condition: RuleCondition {
                risk_profile: *risk,
                field: "investment_amount".to_string(),
                op: ComparisonOp::Lt,
                value: (stats.avg * 0.1).floor(),
            },
            action: RuleAction::SuggestRiskReview,
            reason: format!("investment far below the observed pattern for the {risk} profile"),
            adaptive: true,
        });
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(avg: f64, min: f64, max: f64, count: usize) -> SegmentStats {
        SegmentStats {
            count,
            avg,
            min,
            max,
        }
    }

    #[test]
    fn threshold_formulas() {
        let mut analysis = BTreeMap::new();
        analysis.insert(RiskProfile::Moderate, segment(100_000.0, 20_000.0, 300_000.0, 4));

        let thresholds = synthesize(&analysis);
        let t = &thresholds[&RiskProfile::Moderate];

        assert_eq!(t.min_recommended, 50_000.0);
        assert_eq!(t.max_recommended, 200_000.0);
        assert_eq!(t.alert_threshold, 270_000.0);
        assert_eq!(t.review_threshold, 150_000.0);
    }

    #[test]
    fn thresholds_floor_fractional_averages() {
        let mut analysis = BTreeMap::new();
        analysis.insert(RiskProfile::Aggressive, segment(33_333.0, 10_000.0, 50_000.0, 3));

        let thresholds = synthesize(&analysis);
        let t = &thresholds[&RiskProfile::Aggressive];

        // 33_333 · 0.5 = 16_666.5 → 16_666
        assert_eq!(t.min_recommended, 16_666.0);
        // 33_333 · 1.5 = 49_999.5 → 49_999
        assert_eq!(t.review_threshold, 49_999.0);
    }

    #[test]
    fn two_rules_per_segment() {
        let mut analysis = BTreeMap::new();
        analysis.insert(RiskProfile::Conservative, segment(200_000.0, 50_000.0, 400_000.0, 5));
        analysis.insert(RiskProfile::Aggressive, segment(80_000.0, 60_000.0, 120_000.0, 2));

        let rules = generate_rules(&analysis);
        assert_eq!(rules.len(), 4);

        let approval = &rules[0];
        assert_eq!(approval.condition.risk_profile, RiskProfile::Conservative);
        assert_eq!(approval.condition.op, ComparisonOp::Gt);
        assert_eq!(approval.condition.value, 400_000.0);
        assert_eq!(approval.action, RuleAction::RequireManagerApproval);
        assert!(approval.adaptive);

        let review = &rules[1];
        assert_eq!(review.condition.op, ComparisonOp::Lt);
        // ⌊200_000 · 0.1⌋
        assert_eq!(review.condition.value, 20_000.0);
        assert_eq!(review.action, RuleAction::SuggestRiskReview);
    }

    #[test]
    fn no_segments_yields_no_rules() {
        let analysis = BTreeMap::new();
        assert!(generate_rules(&analysis).is_empty());
        assert!(synthesize(&analysis).is_empty());
    }

    #[test]
    fn rule_action_serializes_snake_case() {
        let json = serde_json::to_string(&RuleAction::RequireManagerApproval).unwrap();
        assert_eq!(json, r#""require_manager_approval""#);
    }
}
