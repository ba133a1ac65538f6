//! API-facing request/response models.
//!
//! These functions are what an HTTP or CLI layer calls; they translate
//! untyped input into core types and core results into serializable views.

use serde::{Deserialize, Serialize};

use crate::core::{
    AllocationError, AllocationManager, Priority, Request, RequestId, ResourceAttribute,
    ResourceStatus, ResourceType, Statistics,
};
use crate::scheduler::Scheduler;

/// Request creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSubmission {
    /// Patient identifier.
    pub patient_id: String,
    /// Resource type name, e.g. `"bed"` or `"Operating Room"`.
    pub resource_type: String,
    /// Priority name or number, e.g. `"critical"` or `"1"`.
    pub priority: String,
    /// Requested duration in minutes.
    pub duration_minutes: u32,
}

/// One committed allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationView {
    /// Request identifier.
    pub request_id: RequestId,
    /// Resource identifier.
    pub resource_id: String,
    /// Resource type.
    pub resource_type: ResourceType,
}

/// Pending request entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    /// Request identifier.
    pub id: RequestId,
    /// Patient identifier.
    pub patient_id: String,
    /// Requested resource type.
    pub resource_type: ResourceType,
    /// Priority.
    pub priority: Priority,
    /// Requested duration in minutes.
    pub duration_minutes: u32,
    /// Arrival (ms).
    pub arrival_ms: u128,
    /// First grant (ms); set for round-robin requests between quanta.
    pub start_ms: Option<u128>,
}

impl From<&Request> for RequestView {
    fn from(req: &Request) -> Self {
        Self {
            id: req.id(),
            patient_id: req.patient_id().to_string(),
            resource_type: req.resource_type(),
            priority: req.priority(),
            duration_minutes: req.duration_minutes(),
            arrival_ms: req.arrival_ms(),
            start_ms: req.start_ms(),
        }
    }
}

/// Resource listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    /// Resource identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resource type.
    pub resource_type: ResourceType,
    /// Current status.
    pub status: ResourceStatus,
    /// Type-specific attribute.
    pub attribute: ResourceAttribute,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Validate a submission, create the request and queue it on `policy`.
pub fn submit_request<S: Scheduler + ?Sized>(
    manager: &AllocationManager,
    policy: &mut S,
    submission: &RequestSubmission,
) -> Result<RequestId, AllocationError> {
    let kind: ResourceType = submission.resource_type.parse()?;
    let priority = submission.priority.parse()?;
    let request = manager.registry().create_request(
        submission.patient_id.clone(),
        kind,
        priority,
        submission.duration_minutes,
    )?;
    let id = request.id();
    policy.add_request(request);
    Ok(id)
}

/// Trigger one allocation pass.
pub fn run_pass<S: Scheduler + ?Sized>(
    manager: &AllocationManager,
    policy: &mut S,
) -> Vec<AllocationView> {
    manager
        .run_allocation_pass(policy)
        .into_iter()
        .map(|g| AllocationView {
            request_id: g.request_id,
            resource_id: g.resource.id().to_string(),
            resource_type: g.resource.resource_type(),
        })
        .collect()
}

/// Every registered resource.
pub fn list_resources(manager: &AllocationManager) -> Vec<ResourceView> {
    manager
        .registry()
        .list_all(None)
        .iter()
        .map(|r| ResourceView {
            id: r.id().to_string(),
            name: r.name().to_string(),
            resource_type: r.resource_type(),
            status: r.status(),
            attribute: r.attribute().clone(),
        })
        .collect()
}

/// Requests still queued on `policy`, in service order.
pub fn list_pending<S: Scheduler + ?Sized>(policy: &S) -> Vec<RequestView> {
    policy.pending().iter().map(RequestView::from).collect()
}

/// Per-type utilization.
pub fn statistics(manager: &AllocationManager) -> Statistics {
    manager.statistics()
}

/// Release allocations expired at `now_ms`; returns the released ids.
pub fn expire(manager: &AllocationManager, now_ms: u128) -> Vec<String> {
    manager
        .expire_allocations_at(now_ms)
        .iter()
        .map(|r| r.id().to_string())
        .collect()
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
