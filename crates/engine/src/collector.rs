//! Concurrent per-tenant data collection.

use std::sync::Arc;

use tracing::debug;

use adaptive_core::EngineResult;

use crate::provider::{TenantDataProvider, TenantRecords};

/// Thin adapter over the data provider: issues the four listing calls
/// concurrently and bundles the results. Carries no retry logic —
/// the first provider error wins and propagates unchanged.
pub struct DataCollector {
    provider: Arc<dyn TenantDataProvider>,
}

impl DataCollector {
    pub fn new(provider: Arc<dyn TenantDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch(&self, tenant_id: &str) -> EngineResult<TenantRecords> {
        let (clients, investment_queries, workflows, files) = tokio::join!(
            self.provider.list_clients(tenant_id),
            self.provider.list_investment_queries(tenant_id),
            self.provider.list_workflows(tenant_id),
            self.provider.list_uploaded_files(tenant_id),
        );

        let records = TenantRecords {
            clients: clients?,
            investment_queries: investment_queries?,
            workflows: workflows?,
            files: files?,
        };

        debug!(
            tenant = tenant_id,
            clients = records.clients.len(),
            queries = records.investment_queries.len(),
            workflows = records.workflows.len(),
            files = records.files.len(),
            "tenant data fetched"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use adaptive_core::{
        ClientRecord, EngineError, InvestmentQueryRecord, UploadedFileRecord, WorkflowRecord,
    };

    use crate::provider::StaticProvider;

    struct FailingProvider;

    #[async_trait::async_trait]
    impl TenantDataProvider for FailingProvider {
        async fn list_clients(&self, _tenant_id: &str) -> EngineResult<Vec<ClientRecord>> {
            Err(EngineError::Provider("connection reset".to_string()))
        }

        async fn list_investment_queries(
            &self,
            _tenant_id: &str,
        ) -> EngineResult<Vec<InvestmentQueryRecord>> {
            Ok(Vec::new())
        }

        async fn list_workflows(&self, _tenant_id: &str) -> EngineResult<Vec<WorkflowRecord>> {
            Ok(Vec::new())
        }

        async fn list_uploaded_files(
            &self,
            _tenant_id: &str,
        ) -> EngineResult<Vec<UploadedFileRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn fetch_bundles_all_four_sets() {
        let records = TenantRecords {
            clients: vec![ClientRecord::default(), ClientRecord::default()],
            ..Default::default()
        };
        let provider = Arc::new(StaticProvider::new().with_tenant("acme", records));
        let collector = DataCollector::new(provider);

        let fetched = collector.fetch("acme").await.unwrap();
        assert_eq!(fetched.clients.len(), 2);
        assert!(fetched.files.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates_unchanged() {
        let collector = DataCollector::new(Arc::new(FailingProvider));
        let err = collector.fetch("acme").await.unwrap_err();
        assert!(matches!(err, EngineError::Provider(_)));
    }
}
