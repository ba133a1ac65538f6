//! Allocation manager: commits scheduling passes and tracks active allocations.
//!
//! Uses two independent locks:
//! - the registry's `RwLock` for pool mutation and request ids;
//! - `active`, a `parking_lot::Mutex` held for the whole of an allocation
//!   pass, an expiry sweep, or an explicit release.
//!
//! Lock order is always `active` then registry, so the two cannot deadlock.
//! Resources are claimed with a single non-blocking attempt each; no code path
//! ever holds more than one resource claim on behalf of one request.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{
    build_audit_event, AuditAction, AuditSink, RequestHandle, RequestId, Resource,
    ResourceRegistry, ResourceStatus, ResourceType, Statistics,
};
use crate::scheduler::{Grant, Scheduler};
use crate::util::clock::{minutes_to_ms, now_ms};

/// A resource held on behalf of a request until `expires_at_ms`.
#[derive(Debug, Clone)]
pub struct ActiveAllocation {
    /// The request being served.
    pub request: RequestHandle,
    /// The held resource.
    pub resource: Arc<Resource>,
    /// Simulated expiry (ms).
    pub expires_at_ms: u128,
    /// Whether expiry completes the request.
    pub completes: bool,
}

/// Serializable view of an active allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    /// Request identifier.
    pub request_id: RequestId,
    /// Resource identifier.
    pub resource_id: String,
    /// Resource type.
    pub resource_type: ResourceType,
    /// Simulated expiry (ms).
    pub expires_at_ms: u128,
}

/// Orchestrates allocation passes over a shared registry.
pub struct AllocationManager {
    registry: Arc<ResourceRegistry>,
    active: Mutex<Vec<ActiveAllocation>>,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
}

impl AllocationManager {
    /// Create a manager over `registry`.
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        Self {
            registry,
            active: Mutex::new(Vec::new()),
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    /// Underlying registry.
    pub const fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Run one allocation pass at the current time.
    pub fn run_allocation_pass<S: Scheduler + ?Sized>(&self, policy: &mut S) -> Vec<Grant> {
        self.run_allocation_pass_at(policy, now_ms())
    }

    /// Run one allocation pass at `now_ms`.
    ///
    /// The policy sees a snapshot of Available resources; every grant it
    /// returns is recorded with expiry `now_ms + slice` and its resource
    /// marked Occupied. Two passes never overlap.
    pub fn run_allocation_pass_at<S: Scheduler + ?Sized>(
        &self,
        policy: &mut S,
        now_ms: u128,
    ) -> Vec<Grant> {
        let mut active = self.active.lock();
        let snapshot = self.registry.list_available(None);
        let grants = policy.schedule(&snapshot, now_ms);

        for grant in &grants {
            debug_assert!(
                !active.iter().any(|a| Arc::ptr_eq(&a.resource, &grant.resource)),
                "resource {} granted while already allocated",
                grant.resource.id()
            );
            grant.resource.set_status(ResourceStatus::Occupied);
            active.push(ActiveAllocation {
                request: Arc::clone(&grant.request),
                resource: Arc::clone(&grant.resource),
                expires_at_ms: now_ms + minutes_to_ms(grant.slice_minutes),
                completes: grant.completes,
            });
            self.record(
                Some(grant.request_id),
                &grant.resource,
                AuditAction::Grant,
                now_ms,
            );
        }

        tracing::info!(
            policy = policy.name(),
            candidates = snapshot.len(),
            granted = grants.len(),
            active = active.len(),
            "allocation pass complete"
        );
        grants
    }

    /// Return a resource to Available and drop any allocation holding it.
    /// Idempotent.
    pub fn release_resource(&self, resource: &Arc<Resource>) {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|a| !Arc::ptr_eq(&a.resource, resource));
        let dropped = before - active.len();
        Self::free(resource);
        if dropped > 0 {
            self.record(None, resource, AuditAction::Release, now_ms());
            tracing::info!(resource = resource.id(), "resource released");
        }
    }

    /// Release every allocation whose expiry is at or before the current time.
    pub fn expire_allocations(&self) -> Vec<Arc<Resource>> {
        self.expire_allocations_at(now_ms())
    }

    /// Release every allocation whose expiry is at or before `now_ms`.
    ///
    /// Completing allocations stamp the request's end time with the
    /// allocation's expiry. Calling again with the same `now_ms` releases
    /// nothing further.
    pub fn expire_allocations_at(&self, now_ms: u128) -> Vec<Arc<Resource>> {
        let mut active = self.active.lock();
        let (expired, retained): (Vec<_>, Vec<_>) =
            active.drain(..).partition(|a| a.expires_at_ms <= now_ms);
        *active = retained;

        let mut released = Vec::with_capacity(expired.len());
        for allocation in expired {
            Self::free(&allocation.resource);
            let request_id = {
                let mut req = allocation.request.lock();
                if allocation.completes {
                    req.record_completion(allocation.expires_at_ms);
                }
                req.id()
            };
            self.record(
                Some(request_id),
                &allocation.resource,
                AuditAction::Expire,
                now_ms,
            );
            tracing::debug!(
                request = request_id,
                resource = allocation.resource.id(),
                "allocation expired"
            );
            released.push(allocation.resource);
        }

        if !released.is_empty() {
            tracing::info!(count = released.len(), "expired allocations released");
        }
        released
    }

    /// Snapshot of active allocations.
    pub fn active_allocations(&self) -> Vec<AllocationSnapshot> {
        self.active
            .lock()
            .iter()
            .map(|a| AllocationSnapshot {
                request_id: a.request.lock().id(),
                resource_id: a.resource.id().to_string(),
                resource_type: a.resource.resource_type(),
                expires_at_ms: a.expires_at_ms,
            })
            .collect()
    }

    /// Number of active allocations.
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Per-type utilization.
    pub fn statistics(&self) -> Statistics {
        self.registry.statistics()
    }

    fn free(resource: &Resource) {
        if resource.status() == ResourceStatus::Occupied {
            resource.set_status(ResourceStatus::Available);
        }
        resource.unclaim();
    }

    fn record(
        &self,
        request_id: Option<RequestId>,
        resource: &Resource,
        action: AuditAction,
        at_ms: u128,
    ) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(
                request_id,
                resource.id(),
                resource.resource_type(),
                action,
                at_ms,
            ));
        }
    }
}
