//! Allocation requests and their priority ordering.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{AllocationError, Resource, ResourceType};
use crate::util::clock::elapsed_ms;

/// Monotonic request identifier, assigned by the registry.
pub type RequestId = u64;

/// Request shared between a scheduler queue and the manager's allocation
/// records.
pub type RequestHandle = Arc<Mutex<Request>>;

/// Clinical urgency. Numerically smaller values are served first, so the
/// derived `Ord` puts `Critical` before `Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Priority {
    /// Emergency.
    Critical = 1,
    /// Urgent care.
    High = 2,
    /// Regular case.
    #[default]
    Medium = 3,
    /// Routine checkup.
    Low = 4,
}

impl Priority {
    /// Numeric value (1 = most urgent).
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = AllocationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Critical),
            2 => Ok(Self::High),
            3 => Ok(Self::Medium),
            4 => Ok(Self::Low),
            other => Err(AllocationError::InvalidPriority(other.to_string())),
        }
    }
}

impl FromStr for Priority {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "1" => Ok(Self::Critical),
            "high" | "2" => Ok(Self::High),
            "medium" | "3" => Ok(Self::Medium),
            "low" | "4" => Ok(Self::Low),
            _ => Err(AllocationError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// A timed demand for one resource of a given type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    id: RequestId,
    patient_id: String,
    resource_type: ResourceType,
    priority: Priority,
    duration_minutes: u32,
    arrival_ms: u128,
    start_ms: Option<u128>,
    end_ms: Option<u128>,
    waiting_ms: u128,
    turnaround_ms: u128,
    #[serde(skip)]
    served_by: Option<Weak<Resource>>,
}

impl Request {
    pub(crate) fn new(
        id: RequestId,
        patient_id: impl Into<String>,
        resource_type: ResourceType,
        priority: Priority,
        duration_minutes: u32,
        arrival_ms: u128,
    ) -> Self {
        Self {
            id,
            patient_id: patient_id.into(),
            resource_type,
            priority,
            duration_minutes,
            arrival_ms,
            start_ms: None,
            end_ms: None,
            waiting_ms: 0,
            turnaround_ms: 0,
            served_by: None,
        }
    }

    /// Wrap into a shared handle.
    pub fn into_handle(self) -> RequestHandle {
        Arc::new(Mutex::new(self))
    }

    /// Request identifier.
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Patient the request is for.
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Requested resource type.
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Urgency.
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Requested duration in minutes.
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Arrival timestamp (ms).
    pub const fn arrival_ms(&self) -> u128 {
        self.arrival_ms
    }

    /// First grant timestamp (ms).
    pub const fn start_ms(&self) -> Option<u128> {
        self.start_ms
    }

    /// Completion timestamp (ms).
    pub const fn end_ms(&self) -> Option<u128> {
        self.end_ms
    }

    /// Time spent waiting before the first grant (ms).
    pub const fn waiting_ms(&self) -> u128 {
        self.waiting_ms
    }

    /// Arrival-to-completion time (ms).
    pub const fn turnaround_ms(&self) -> u128 {
        self.turnaround_ms
    }

    /// Whether the request has reached completion.
    pub const fn is_completed(&self) -> bool {
        self.end_ms.is_some()
    }

    /// Resource that last served this request, if it still exists.
    pub fn served_by(&self) -> Option<Arc<Resource>> {
        self.served_by.as_ref().and_then(Weak::upgrade)
    }

    /// Record a grant. Start and waiting time are only set on the first call.
    pub(crate) fn record_grant(&mut self, resource: &Arc<Resource>, now_ms: u128) {
        self.served_by = Some(Arc::downgrade(resource));
        if self.start_ms.is_none() {
            self.start_ms = Some(now_ms);
            self.waiting_ms = elapsed_ms(self.arrival_ms, now_ms);
        }
    }

    /// Mark completion at `end_ms`. Returns `false` if already completed.
    pub(crate) fn record_completion(&mut self, end_ms: u128) -> bool {
        if self.end_ms.is_some() {
            return false;
        }
        if let Some(start) = self.start_ms {
            debug_assert!(end_ms >= start, "end time {end_ms} precedes start {start}");
        }
        self.end_ms = Some(end_ms);
        self.turnaround_ms = elapsed_ms(self.arrival_ms, end_ms);
        true
    }
}
