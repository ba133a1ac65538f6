//! Tests for utility functions and shared enumerations

use hospital_allocator::core::{Priority, ResourceStatus, ResourceType};
use hospital_allocator::util::clock::{elapsed_ms, minutes_to_ms, now_ms, MS_PER_MINUTE};
use hospital_allocator::util::init_tracing;

#[test]
fn test_priority_ordering() {
    assert!(Priority::Critical < Priority::High);
    assert!(Priority::High < Priority::Medium);
    assert!(Priority::Medium < Priority::Low);
    assert_eq!(Priority::Critical.value(), 1);
    assert_eq!(Priority::Low.value(), 4);
    assert_eq!(Priority::default(), Priority::Medium);
}

#[test]
fn test_priority_conversions() {
    assert_eq!(Priority::try_from(2u8), Ok(Priority::High));
    assert!(Priority::try_from(0u8).is_err());
    assert!(Priority::try_from(5u8).is_err());
    assert_eq!(Priority::High.to_string(), "High");
}

#[test]
fn test_resource_type_parsing() {
    assert_eq!("Operating Room".parse::<ResourceType>(), Ok(ResourceType::OperatingRoom));
    assert_eq!("operating_room".parse::<ResourceType>(), Ok(ResourceType::OperatingRoom));
    assert_eq!("BED".parse::<ResourceType>(), Ok(ResourceType::Bed));
    assert!("nurse".parse::<ResourceType>().is_err());
}

#[test]
fn test_resource_status_serde() {
    let json = serde_json::to_string(&ResourceStatus::Maintenance).unwrap();
    let back: ResourceStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ResourceStatus::Maintenance);
}

#[test]
fn test_clock_helpers() {
    assert_eq!(minutes_to_ms(0), 0);
    assert_eq!(minutes_to_ms(30), 30 * MS_PER_MINUTE);
    assert_eq!(elapsed_ms(1_000, 4_000), 3_000);
    assert!(now_ms() > 1_600_000_000_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
