//! Tenant data provider trait and the in-memory implementation.
//!
//! The engine never owns tenant records; it reads them through
//! [`TenantDataProvider`]. Each listing is a full scan for the tenant —
//! no pagination contract is assumed. Transport failures propagate
//! unchanged to the caller; retry policy lives outside the engine.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use adaptive_core::{
    ClientRecord, EngineError, EngineResult, InvestmentQueryRecord, TenantId, UploadedFileRecord,
    WorkflowRecord,
};

// ── Provider trait ──────────────────────────────────────────────────

/// Read-only access to the four tenant-scoped record sets.
#[async_trait::async_trait]
pub trait TenantDataProvider: Send + Sync {
    async fn list_clients(&self, tenant_id: &str) -> EngineResult<Vec<ClientRecord>>;

    async fn list_investment_queries(
        &self,
        tenant_id: &str,
    ) -> EngineResult<Vec<InvestmentQueryRecord>>;

    async fn list_workflows(&self, tenant_id: &str) -> EngineResult<Vec<WorkflowRecord>>;

    async fn list_uploaded_files(&self, tenant_id: &str) -> EngineResult<Vec<UploadedFileRecord>>;
}

// ── Record bundle ───────────────────────────────────────────────────

/// The four record sets for one tenant, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantRecords {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub investment_queries: Vec<InvestmentQueryRecord>,
    #[serde(default)]
    pub workflows: Vec<WorkflowRecord>,
    #[serde(default)]
    pub files: Vec<UploadedFileRecord>,
}

// ── Static provider ─────────────────────────────────────────────────

/// In-memory provider keyed by tenant. Backs tests and the
/// `pattern-worker` binary; unknown tenants scan as empty.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tenants: HashMap<TenantId, TenantRecords>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one tenant's record sets.
    pub fn with_tenant(mut self, tenant_id: impl Into<TenantId>, records: TenantRecords) -> Self {
        self.tenants.insert(tenant_id.into(), records);
        self
    }

    /// Load a fixture file: a JSON object mapping tenant id to record sets.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::Provider(format!("fixture read failed: {e}")))?;
        let tenants: HashMap<TenantId, TenantRecords> = serde_json::from_str(&raw)?;
        Ok(Self { tenants })
    }

    fn records(&self, tenant_id: &str) -> TenantRecords {
        self.tenants.get(tenant_id).cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TenantDataProvider for StaticProvider {
    async fn list_clients(&self, tenant_id: &str) -> EngineResult<Vec<ClientRecord>> {
        Ok(self.records(tenant_id).clients)
    }

    async fn list_investment_queries(
        &self,
        tenant_id: &str,
    ) -> EngineResult<Vec<InvestmentQueryRecord>> {
        Ok(self.records(tenant_id).investment_queries)
    }

    async fn list_workflows(&self, tenant_id: &str) -> EngineResult<Vec<WorkflowRecord>> {
        Ok(self.records(tenant_id).workflows)
    }

    async fn list_uploaded_files(&self, tenant_id: &str) -> EngineResult<Vec<UploadedFileRecord>> {
        Ok(self.records(tenant_id).files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn unknown_tenant_scans_empty() {
        let provider = StaticProvider::new();
        let clients = provider.list_clients("nobody").await.unwrap();
        assert!(clients.is_empty());
    }

    #[tokio::test]
    async fn with_tenant_serves_records() {
        let records = TenantRecords {
            clients: vec![ClientRecord::default()],
            ..Default::default()
        };
        let provider = StaticProvider::new().with_tenant("acme", records);

        assert_eq!(provider.list_clients("acme").await.unwrap().len(), 1);
        assert!(provider.list_workflows("acme").await.unwrap().is_empty());
    }

    #[test]
    fn fixture_file_loads_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "acme": {{ "clients": [{{ "investment_amount": 5000.0 }}] }} }}"#
        )
        .unwrap();

        let provider = StaticProvider::from_json_file(file.path()).unwrap();
        let records = provider.records("acme");
        assert_eq!(records.clients.len(), 1);
        assert_eq!(records.clients[0].investment_amount, 5000.0);
        assert!(records.workflows.is_empty());
    }
}
