//! Tests for builders

use hospital_allocator::builders::{build_allocator, build_policy, default_inventory};
use hospital_allocator::config::{AllocatorConfig, InventoryConfig, PolicyConfig};
use hospital_allocator::core::{AllocationError, Priority, ResourceType};
use hospital_allocator::scheduler::Scheduler;

#[test]
fn test_default_inventory_layout() {
    let resources = default_inventory(&InventoryConfig::default());
    assert_eq!(resources.len(), 23);

    let beds: Vec<_> = resources
        .iter()
        .filter(|r| r.resource_type() == ResourceType::Bed)
        .map(|r| (r.id().to_string(), r.attribute().value().to_string()))
        .collect();
    let departments: Vec<&str> = beds.iter().map(|(_, d)| d.as_str()).collect();
    assert_eq!(beds[0].0, "B001");
    assert_eq!(beds[9].0, "B010");
    assert_eq!(
        departments,
        vec![
            "ICU", "ICU", "ICU", "General", "General", "General", "General", "Emergency",
            "Emergency", "Emergency"
        ]
    );

    let first_doctor = resources
        .iter()
        .find(|r| r.resource_type() == ResourceType::Doctor)
        .unwrap();
    assert_eq!(first_doctor.id(), "D001");
    assert_eq!(first_doctor.name(), "Dr. A");
    assert_eq!(first_doctor.attribute().value(), "Cardiology");

    let rooms: Vec<_> = resources
        .iter()
        .filter(|r| r.resource_type() == ResourceType::OperatingRoom)
        .map(|r| r.attribute().value().to_string())
        .collect();
    assert_eq!(rooms, vec!["Advanced", "Standard", "Basic", "Advanced", "Standard"]);
}

#[test]
fn test_build_policy_names() {
    assert_eq!(
        build_policy(&PolicyConfig::Fcfs).unwrap().name(),
        "FCFS (First-Come-First-Served)"
    );
    assert_eq!(
        build_policy(&PolicyConfig::Priority).unwrap().name(),
        "Priority Scheduling"
    );
    assert_eq!(
        build_policy(&PolicyConfig::RoundRobin { quantum_minutes: 45 })
            .unwrap()
            .name(),
        "Round Robin (Quantum: 45min)"
    );
    assert!(matches!(
        build_policy(&PolicyConfig::RoundRobin { quantum_minutes: 0 }),
        Err(AllocationError::InvalidConfig(_))
    ));
}

#[test]
fn test_build_allocator_with_audit() {
    let cfg = AllocatorConfig {
        policy: PolicyConfig::Priority,
        audit_capacity: 8,
        ..Default::default()
    };
    let mut allocator = build_allocator(&cfg).unwrap();
    assert_eq!(allocator.manager.registry().len(), 23);

    let request = allocator
        .manager
        .registry()
        .create_request("p-1", ResourceType::OperatingRoom, Priority::Critical, 120)
        .unwrap();
    allocator.policy.add_request(request);
    let grants = allocator.manager.run_allocation_pass(&mut allocator.policy);
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].resource.id(), "OR001");

    let audit = allocator.audit.expect("audit enabled");
    assert_eq!(audit.events().len(), 1);
    assert_eq!(audit.events()[0].resource_id, "OR001");
}

#[test]
fn test_build_allocator_rejects_invalid_config() {
    let cfg = AllocatorConfig {
        inventory: InventoryConfig {
            beds: 0,
            doctors: 0,
            operating_rooms: 0,
        },
        ..Default::default()
    };
    assert!(matches!(
        build_allocator(&cfg),
        Err(AllocationError::InvalidConfig(_))
    ));
    assert!(build_allocator(&AllocatorConfig::default())
        .unwrap()
        .audit
        .is_none());
}
