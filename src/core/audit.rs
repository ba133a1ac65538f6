//! Allocation audit trail.
//!
//! The manager records one event per grant, release and expiry when a sink is
//! attached.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{RequestId, ResourceType};
use crate::util::clock::now_ms;

/// What happened to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Resource granted to a request by an allocation pass.
    Grant,
    /// Resource released explicitly.
    Release,
    /// Resource released because its allocation expired.
    Expire,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related request, when known.
    pub request_id: Option<RequestId>,
    /// Resource identifier.
    pub resource_id: String,
    /// Resource type.
    pub resource_type: ResourceType,
    /// Action taken.
    pub action: AuditAction,
    /// Simulated time the action refers to (ms).
    pub at_ms: u128,
    /// Wall-clock time the event was recorded (ms).
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer, so a caller can keep one clone for reading
/// after handing another to the manager.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event with a fresh id.
pub fn build_audit_event(
    request_id: Option<RequestId>,
    resource_id: impl Into<String>,
    resource_type: ResourceType,
    action: AuditAction,
    at_ms: u128,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        request_id,
        resource_id: resource_id.into(),
        resource_type,
        action,
        at_ms,
        created_at_ms: now_ms(),
    }
}
