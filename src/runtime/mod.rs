//! API surface and runtime adapters.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod sweeper;

pub use api::{
    expire, health, list_pending, list_resources, run_pass, statistics, submit_request,
    AllocationView, Health, RequestSubmission, RequestView, ResourceView,
};
#[cfg(feature = "tokio-runtime")]
pub use sweeper::{spawn_expiry_sweeper, SweeperHandle, MIN_SWEEP_INTERVAL};
