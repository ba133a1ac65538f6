//! Tests for error types

use hospital_allocator::core::{AllocationError, ResourceStatus};

#[test]
fn test_invalid_resource_type_error() {
    let err = AllocationError::InvalidResourceType("ventilator".to_string());
    assert_eq!(format!("{}", err), "invalid resource type: ventilator");
}

#[test]
fn test_not_removable_error() {
    let err = AllocationError::ResourceNotRemovable {
        id: "B001".to_string(),
        status: ResourceStatus::Occupied,
    };
    assert_eq!(format!("{}", err), "resource B001 not removable while Occupied");
}

#[test]
fn test_not_found_error() {
    let err = AllocationError::ResourceNotFound("OR009".to_string());
    assert_eq!(format!("{}", err), "resource not found: OR009");
}

#[test]
fn test_invalid_duration_error() {
    let err = AllocationError::InvalidDuration(0);
    assert_eq!(format!("{}", err), "invalid duration: 0 minutes");
}

#[test]
fn test_converts_into_anyhow() {
    let result: hospital_allocator::core::AppResult<()> =
        Err(AllocationError::InvalidConfig("empty".into()).into());
    assert_eq!(result.unwrap_err().to_string(), "invalid config: empty");
}
