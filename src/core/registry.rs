//! Resource registry: per-type pools and request id assignment.
//!
//! Mutation (add/remove, maintenance changes, request id assignment) takes the
//! registry's write lock. Listings and statistics take the read lock and may
//! interleave with each other and with an allocation pass.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::{
    AllocationError, Priority, Request, RequestId, Resource, ResourceStatus, ResourceType,
};
use crate::util::clock::now_ms;

/// Utilization figures for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeStatistics {
    /// Resources registered.
    pub total: usize,
    /// Available resources.
    pub available: usize,
    /// Occupied resources.
    pub occupied: usize,
    /// Resources under maintenance.
    pub maintenance: usize,
    /// `occupied / total * 100`, or 0 for an empty pool.
    pub utilization: f64,
}

/// Per-type utilization snapshot.
pub type Statistics = BTreeMap<ResourceType, TypeStatistics>;

struct Pools {
    by_type: HashMap<ResourceType, Vec<Arc<Resource>>>,
    last_request_id: RequestId,
}

impl Pools {
    fn pool(&self, kind: ResourceType) -> &[Arc<Resource>] {
        self.by_type.get(&kind).map_or(&[], Vec::as_slice)
    }

    fn selected(&self, kind: Option<ResourceType>) -> impl Iterator<Item = &Arc<Resource>> {
        ResourceType::ALL
            .into_iter()
            .filter(move |t| kind.is_none_or(|k| k == *t))
            .flat_map(|t| self.pool(t).iter())
    }

    fn find(&self, id: &str) -> Option<&Arc<Resource>> {
        self.by_type.values().flatten().find(|r| r.id() == id)
    }
}

/// Owns every resource pool.
pub struct ResourceRegistry {
    inner: RwLock<Pools>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let by_type = ResourceType::ALL.into_iter().map(|t| (t, Vec::new())).collect();
        Self {
            inner: RwLock::new(Pools {
                by_type,
                last_request_id: 0,
            }),
        }
    }

    /// Insert a resource into the pool for its type.
    pub fn add_resource(&self, resource: Resource) -> Arc<Resource> {
        let resource = Arc::new(resource);
        let kind = resource.resource_type();
        self.inner
            .write()
            .by_type
            .entry(kind)
            .or_default()
            .push(Arc::clone(&resource));
        tracing::info!(resource = resource.id(), kind = %kind, "resource added");
        resource
    }

    /// Remove an Available resource, reporting why removal failed otherwise.
    ///
    /// The removed resource keeps its claim flag set, so a pass still holding
    /// an older snapshot can never grant it.
    pub fn try_remove_resource(
        &self,
        id: &str,
        kind: ResourceType,
    ) -> Result<Arc<Resource>, AllocationError> {
        let mut pools = self.inner.write();
        let pool = pools.by_type.entry(kind).or_default();
        let idx = pool
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AllocationError::ResourceNotFound(id.to_string()))?;

        let resource = &pool[idx];
        if !resource.try_claim() {
            return Err(AllocationError::ResourceNotRemovable {
                id: id.to_string(),
                status: resource.status(),
            });
        }
        let status = resource.status();
        if status != ResourceStatus::Available {
            resource.unclaim();
            return Err(AllocationError::ResourceNotRemovable {
                id: id.to_string(),
                status,
            });
        }
        let removed = pool.remove(idx);
        tracing::info!(resource = id, kind = %kind, "resource removed");
        Ok(removed)
    }

    /// Remove an Available resource. Returns `false` for unknown ids and for
    /// resources that are not Available.
    pub fn remove_resource(&self, id: &str, kind: ResourceType) -> bool {
        match self.try_remove_resource(id, kind) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(resource = id, error = %err, "resource removal rejected");
                false
            }
        }
    }

    /// Snapshot of Available, unclaimed resources, optionally of one type.
    pub fn list_available(&self, kind: Option<ResourceType>) -> Vec<Arc<Resource>> {
        self.inner
            .read()
            .selected(kind)
            .filter(|r| r.is_available())
            .cloned()
            .collect()
    }

    /// Snapshot of every resource, optionally of one type.
    pub fn list_all(&self, kind: Option<ResourceType>) -> Vec<Arc<Resource>> {
        self.inner.read().selected(kind).cloned().collect()
    }

    /// Look up a resource by id.
    pub fn find(&self, id: &str) -> Option<Arc<Resource>> {
        self.inner.read().find(id).cloned()
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.inner.read().by_type.values().map(Vec::len).sum()
    }

    /// True when no resources are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a request arriving now.
    pub fn create_request(
        &self,
        patient_id: impl Into<String>,
        kind: ResourceType,
        priority: Priority,
        duration_minutes: u32,
    ) -> Result<Request, AllocationError> {
        self.create_request_at(patient_id, kind, priority, duration_minutes, now_ms())
    }

    /// Create a request with an explicit arrival timestamp. The id is
    /// assigned under the registry's write lock.
    pub fn create_request_at(
        &self,
        patient_id: impl Into<String>,
        kind: ResourceType,
        priority: Priority,
        duration_minutes: u32,
        arrival_ms: u128,
    ) -> Result<Request, AllocationError> {
        if duration_minutes == 0 {
            return Err(AllocationError::InvalidDuration(duration_minutes));
        }
        let id = {
            let mut pools = self.inner.write();
            pools.last_request_id += 1;
            pools.last_request_id
        };
        tracing::debug!(request = id, kind = %kind, priority = %priority, "request created");
        Ok(Request::new(
            id,
            patient_id,
            kind,
            priority,
            duration_minutes,
            arrival_ms,
        ))
    }

    /// Take an Available resource out of service.
    pub fn set_maintenance(&self, id: &str) -> Result<(), AllocationError> {
        let pools = self.inner.write();
        let resource = pools
            .find(id)
            .ok_or_else(|| AllocationError::ResourceNotFound(id.to_string()))?;
        if !resource.try_claim() {
            return Err(AllocationError::ResourceNotRemovable {
                id: id.to_string(),
                status: resource.status(),
            });
        }
        let moved = resource.transition(ResourceStatus::Available, ResourceStatus::Maintenance);
        let status = resource.status();
        resource.unclaim();
        if moved {
            tracing::info!(resource = id, "resource under maintenance");
            Ok(())
        } else {
            Err(AllocationError::ResourceNotRemovable {
                id: id.to_string(),
                status,
            })
        }
    }

    /// Return a resource under maintenance to service.
    pub fn restore(&self, id: &str) -> Result<(), AllocationError> {
        let pools = self.inner.write();
        let resource = pools
            .find(id)
            .ok_or_else(|| AllocationError::ResourceNotFound(id.to_string()))?;
        if resource.transition(ResourceStatus::Maintenance, ResourceStatus::Available) {
            tracing::info!(resource = id, "resource restored");
            Ok(())
        } else {
            Err(AllocationError::ResourceNotRemovable {
                id: id.to_string(),
                status: resource.status(),
            })
        }
    }

    /// Per-type counts and utilization.
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> Statistics {
        let pools = self.inner.read();
        ResourceType::ALL
            .into_iter()
            .map(|kind| {
                let pool = pools.pool(kind);
                let count = |status| pool.iter().filter(|r| r.status() == status).count();
                let total = pool.len();
                let occupied = count(ResourceStatus::Occupied);
                let utilization = if total == 0 {
                    0.0
                } else {
                    occupied as f64 / total as f64 * 100.0
                };
                let stats = TypeStatistics {
                    total,
                    available: count(ResourceStatus::Available),
                    occupied,
                    maintenance: count(ResourceStatus::Maintenance),
                    utilization,
                };
                (kind, stats)
            })
            .collect()
    }
}
