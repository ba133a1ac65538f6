//! Scheduling policies.
//!
//! A policy owns the pending requests and decides, once per allocation pass,
//! which request gets which of the currently Available resources. Policies
//! only claim resources; the [`AllocationManager`](crate::core::AllocationManager)
//! commits each returned [`Grant`] and marks the resource Occupied.

pub mod fcfs;
pub mod metrics;
pub mod priority;
pub mod round_robin;

use std::sync::Arc;

use crate::core::{
    AllocationError, Request, RequestHandle, RequestId, Resource, ResourceStatus, ResourceType,
};

pub use fcfs::FcfsScheduler;
pub use metrics::{CompletionLedger, SchedulerMetrics};
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;

/// One resource handed to one request by a pass.
#[derive(Debug, Clone)]
pub struct Grant {
    /// Request identifier.
    pub request_id: RequestId,
    /// The granted request.
    pub request: RequestHandle,
    /// The claimed resource.
    pub resource: Arc<Resource>,
    /// Simulated minutes the resource is held for.
    pub slice_minutes: u32,
    /// Minutes of work left on the request after this grant.
    pub remaining_minutes: u32,
    /// Whether this grant finishes the request's work.
    pub completes: bool,
}

/// Queuing discipline shared by every policy.
pub trait Scheduler {
    /// Display name.
    fn name(&self) -> &str;

    /// Queue a request. Returns the shared handle the policy keeps.
    fn add_request(&mut self, request: Request) -> RequestHandle;

    /// The request the next pass would consider first.
    fn get_next_request(&self) -> Option<Request>;

    /// Run one pass over pending requests against `available`.
    ///
    /// Each resource is claimed by at most one request. Requests without a
    /// matching resource stay pending.
    fn schedule(&mut self, available: &[Arc<Resource>], now_ms: u128) -> Vec<Grant>;

    /// Snapshot of pending requests in service order.
    fn pending(&self) -> Vec<Request>;

    /// Current metrics.
    fn metrics(&self) -> SchedulerMetrics;

    /// Drop all queued state and metrics.
    fn reset(&mut self);
}

/// The fixed set of policies.
pub enum SchedulerPolicy {
    /// First-come-first-served.
    Fcfs(FcfsScheduler),
    /// Strict priority, non-preemptive.
    Priority(PriorityScheduler),
    /// Round-robin with a time quantum.
    RoundRobin(RoundRobinScheduler),
}

impl SchedulerPolicy {
    /// FCFS policy.
    pub fn fcfs() -> Self {
        Self::Fcfs(FcfsScheduler::new())
    }

    /// Priority policy.
    pub fn priority() -> Self {
        Self::Priority(PriorityScheduler::new())
    }

    /// Round-robin policy with `quantum_minutes` per slice.
    pub fn round_robin(quantum_minutes: u32) -> Result<Self, AllocationError> {
        RoundRobinScheduler::new(quantum_minutes).map(Self::RoundRobin)
    }
}

macro_rules! dispatch {
    ($policy:expr, $s:ident => $call:expr) => {
        match $policy {
            SchedulerPolicy::Fcfs($s) => $call,
            SchedulerPolicy::Priority($s) => $call,
            SchedulerPolicy::RoundRobin($s) => $call,
        }
    };
}

impl Scheduler for SchedulerPolicy {
    fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    fn add_request(&mut self, request: Request) -> RequestHandle {
        dispatch!(self, s => s.add_request(request))
    }

    fn get_next_request(&self) -> Option<Request> {
        dispatch!(self, s => s.get_next_request())
    }

    fn schedule(&mut self, available: &[Arc<Resource>], now_ms: u128) -> Vec<Grant> {
        dispatch!(self, s => s.schedule(available, now_ms))
    }

    fn pending(&self) -> Vec<Request> {
        dispatch!(self, s => s.pending())
    }

    fn metrics(&self) -> SchedulerMetrics {
        dispatch!(self, s => s.metrics())
    }

    fn reset(&mut self) {
        dispatch!(self, s => s.reset());
    }
}

/// Claim the first Available resource of `kind`. Each candidate gets a single
/// non-blocking claim attempt.
pub(crate) fn claim_matching(
    available: &[Arc<Resource>],
    kind: ResourceType,
) -> Option<Arc<Resource>> {
    available
        .iter()
        .filter(|r| r.resource_type() == kind && r.status() == ResourceStatus::Available)
        .find(|r| claim_if_available(r))
        .cloned()
}

/// Take the claim and confirm the resource is still Available.
///
/// Maintenance and removal change status only while holding the claim, so a
/// resource that left Available between the snapshot and the claim is handed
/// back here.
fn claim_if_available(resource: &Resource) -> bool {
    if !resource.try_claim() {
        return false;
    }
    if resource.status() == ResourceStatus::Available {
        return true;
    }
    resource.unclaim();
    false
}
