//! # Hospital Allocator
//!
//! Policy-driven allocation of scarce, typed, mutually-exclusive hospital
//! resources (beds, physicians, operating rooms) to timed requests.
//!
//! ## Key Features
//!
//! - **Resource Registry**: thread-safe per-type pools with monotonic request ids
//! - **Pluggable Policies**: FCFS, strict priority, and round-robin with a time quantum
//! - **Allocation Manager**: serialized allocation passes, expiry tracking, utilization stats
//! - **Deadlock-free claiming**: every resource claim is a single non-blocking try
//! - **Simulated time**: durations are bookkeeping, never slept on
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hospital_allocator::core::{AllocationManager, Priority, Resource, ResourceRegistry, ResourceType};
//! use hospital_allocator::scheduler::{Scheduler, SchedulerPolicy};
//!
//! let registry = Arc::new(ResourceRegistry::new());
//! registry.add_resource(Resource::bed("B001", "Bed 1", "ICU"));
//! let manager = AllocationManager::new(Arc::clone(&registry));
//!
//! let mut policy = SchedulerPolicy::priority();
//! let request = registry
//!     .create_request_at("patient-7", ResourceType::Bed, Priority::Critical, 30, 0)
//!     .unwrap();
//! policy.add_request(request);
//!
//! let grants = manager.run_allocation_pass_at(&mut policy, 1_000);
//! assert_eq!(grants.len(), 1);
//! assert_eq!(manager.expire_allocations_at(1_000 + 30 * 60_000).len(), 1);
//! ```
//!
//! For complete scenarios, see `tests/allocation_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Resource/request model, registry, and allocation manager.
pub mod core;
/// Scheduling policies and their metrics.
pub mod scheduler;
/// Configuration models for policies and inventory.
pub mod config;
/// Builders to construct allocator components from configuration.
pub mod builders;
/// API surface and runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;
