//! Core data model, resource registry and allocation manager.

pub mod audit;
pub mod error;
pub mod manager;
pub mod registry;
pub mod request;
pub mod resource;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AllocationError, AppResult};
pub use manager::{ActiveAllocation, AllocationManager, AllocationSnapshot};
pub use registry::{ResourceRegistry, Statistics, TypeStatistics};
pub use request::{Priority, Request, RequestHandle, RequestId};
pub use resource::{Resource, ResourceAttribute, ResourceStatus, ResourceType};
