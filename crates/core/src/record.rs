//! Tenant-scoped domain records as delivered by the external data provider.
//!
//! Field defaults are resolved here at the deserialization boundary, so
//! the analysis code downstream never has to reason about missing fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isolated customer/organization whose data is analyzed separately.
pub type TenantId = String;

/// Investment risk appetite of a client. Records without an explicit
/// profile are treated as moderate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// All known profiles, in canonical order.
    pub const ALL: [RiskProfile; 3] = [
        RiskProfile::Conservative,
        RiskProfile::Moderate,
        RiskProfile::Aggressive,
    ];

    /// Lowercase label used in rule conditions and distribution keys.
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A managed client. Owned by the data provider; read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default)]
    pub risk_profile: RiskProfile,
    /// Total invested amount. Non-negative by provider contract; 0 when absent.
    #[serde(default)]
    pub investment_amount: f64,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Lifecycle state of a workflow definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Active,
    Inactive,
    #[default]
    Draft,
}

/// A workflow definition with its cumulative execution counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub execution_count: u64,
}

/// A saved investment query, tagged with its connection type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentQueryRecord {
    pub id: Uuid,
    #[serde(default)]
    pub connection_type: Option<String>,
}

/// An uploaded file. The extension of `original_name` drives the
/// file-type tally in data-usage analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFileRecord {
    pub id: Uuid,
    pub original_name: String,
}
