//! Strict, non-preemptive priority policy.
//!
//! Pending requests are ordered by `(priority, id)`: Critical before Low, and
//! among equal priorities the earlier id first. A granted request keeps its
//! resource until the allocation expires; later arrivals never revoke it.
//! Low-priority requests can starve under sustained pressure.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use crate::core::{Priority, Request, RequestHandle, RequestId, Resource, ResourceType};
use crate::scheduler::{claim_matching, CompletionLedger, Grant, Scheduler, SchedulerMetrics};

/// Heap entry; ordering keys are copied out so comparisons never lock.
struct PendingEntry {
    priority: Priority,
    id: RequestId,
    kind: ResourceType,
    request: RequestHandle,
}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingEntry {}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: smallest (priority, id) pops first.
        (other.priority, other.id).cmp(&(self.priority, self.id))
    }
}

/// Priority queue scheduler.
#[derive(Default)]
pub struct PriorityScheduler {
    heap: BinaryHeap<PendingEntry>,
    ledger: CompletionLedger,
}

impl PriorityScheduler {
    /// Create an empty priority scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &str {
        "Priority Scheduling"
    }

    fn add_request(&mut self, request: Request) -> RequestHandle {
        let (priority, id, kind) = (request.priority(), request.id(), request.resource_type());
        let handle = request.into_handle();
        self.heap.push(PendingEntry {
            priority,
            id,
            kind,
            request: Arc::clone(&handle),
        });
        self.ledger.submitted();
        handle
    }

    fn get_next_request(&self) -> Option<Request> {
        self.heap.peek().map(|e| e.request.lock().clone())
    }

    fn schedule(&mut self, available: &[Arc<Resource>], now_ms: u128) -> Vec<Grant> {
        self.ledger.fold_completed();
        let mut grants = Vec::new();
        let mut deferred = Vec::new();
        // Types that already failed to match this pass; nothing frees up mid-pass.
        let mut exhausted: HashSet<ResourceType> = HashSet::new();

        while let Some(entry) = self.heap.pop() {
            let claimed = if exhausted.contains(&entry.kind) {
                None
            } else {
                claim_matching(available, entry.kind)
            };
            let Some(resource) = claimed else {
                tracing::debug!(request = entry.id, priority = %entry.priority, "deferred");
                exhausted.insert(entry.kind);
                deferred.push(entry);
                continue;
            };

            let slice_minutes = {
                let mut req = entry.request.lock();
                req.record_grant(&resource, now_ms);
                req.duration_minutes()
            };
            tracing::debug!(
                request = entry.id,
                priority = %entry.priority,
                resource = resource.id(),
                "granted"
            );
            grants.push(Grant {
                request_id: entry.id,
                request: Arc::clone(&entry.request),
                resource,
                slice_minutes,
                remaining_minutes: 0,
                completes: true,
            });
            self.ledger.served(entry.request);
        }

        self.heap.extend(deferred);
        grants
    }

    fn pending(&self) -> Vec<Request> {
        let mut entries: Vec<&PendingEntry> = self.heap.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|e| e.request.lock().clone()).collect()
    }

    fn metrics(&self) -> SchedulerMetrics {
        self.ledger.metrics(self.heap.len())
    }

    fn reset(&mut self) {
        self.heap.clear();
        self.ledger.clear();
    }
}
