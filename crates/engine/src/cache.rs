//! Per-tenant snapshot store.
//!
//! The store holds exactly one snapshot per tenant: the most recent.
//! Writes are full overwrites with an explicit last-write-wins contract —
//! two concurrent analyses for the same tenant race on the final write,
//! and the version stamp makes the winner observable. Entries are never
//! evicted; there is no TTL and no invalidation on underlying data
//! change.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use adaptive_core::{EngineError, EngineResult, TenantId};

use crate::snapshot::TenantPatternSnapshot;

/// A stored snapshot with its monotonically increasing write version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub version: u64,
    pub snapshot: TenantPatternSnapshot,
}

/// Injected tenant-scoped snapshot store.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Latest snapshot for the tenant, if any analysis has run.
    async fn get(&self, tenant_id: &str) -> EngineResult<Option<StoredSnapshot>>;

    /// Overwrite the tenant's snapshot; returns the new version.
    async fn put(&self, tenant_id: &str, snapshot: TenantPatternSnapshot) -> EngineResult<u64>;
}

/// Default in-process store backed by a `RwLock`ed map.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    entries: RwLock<HashMap<TenantId, StoredSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(&self, tenant_id: &str) -> EngineResult<Option<StoredSnapshot>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| EngineError::Store("snapshot store lock poisoned".to_string()))?;
        Ok(entries.get(tenant_id).cloned())
    }

    async fn put(&self, tenant_id: &str, snapshot: TenantPatternSnapshot) -> EngineResult<u64> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| EngineError::Store("snapshot store lock poisoned".to_string()))?;
        let version = entries.get(tenant_id).map(|s| s.version).unwrap_or(0) + 1;
        entries.insert(tenant_id.to_string(), StoredSnapshot { version, snapshot });
        Ok(version)
    }
}
