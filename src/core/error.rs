//! Error types for registry, manager and API operations.

use thiserror::Error;

use crate::core::ResourceStatus;

/// Errors produced by allocation components.
///
/// A request that finds no matching resource during a pass is not an error;
/// it stays pending for the next pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Resource type name not recognised.
    #[error("invalid resource type: {0}")]
    InvalidResourceType(String),
    /// Priority name or value not recognised.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
    /// Requested duration must be a positive number of minutes.
    #[error("invalid duration: {0} minutes")]
    InvalidDuration(u32),
    /// No resource with the given id in the target pool.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// Resource exists but is not in a removable state.
    #[error("resource {id} not removable while {status}")]
    ResourceNotRemovable {
        /// Resource identifier.
        id: String,
        /// Status observed at removal time.
        status: ResourceStatus,
    },
    /// Configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
