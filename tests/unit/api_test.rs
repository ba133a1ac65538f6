//! Tests for the API surface

use std::sync::Arc;

use hospital_allocator::core::{
    AllocationError, AllocationManager, Priority, Resource, ResourceRegistry, ResourceStatus,
    ResourceType,
};
use hospital_allocator::runtime::{
    expire, health, list_pending, list_resources, run_pass, statistics, submit_request,
    RequestSubmission,
};
use hospital_allocator::scheduler::SchedulerPolicy;
use hospital_allocator::util::clock::{minutes_to_ms, now_ms};

fn manager() -> AllocationManager {
    let registry = Arc::new(ResourceRegistry::new());
    registry.add_resource(Resource::bed("B001", "Bed 1", "ICU"));
    registry.add_resource(Resource::doctor("D001", "Dr. A", "Cardiology"));
    AllocationManager::new(registry)
}

fn submission(resource_type: &str, priority: &str, minutes: u32) -> RequestSubmission {
    RequestSubmission {
        patient_id: "P-100".to_string(),
        resource_type: resource_type.to_string(),
        priority: priority.to_string(),
        duration_minutes: minutes,
    }
}

#[test]
fn test_submit_rejects_unknown_resource_type() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::fcfs();
    let err = submit_request(&mgr, &mut policy, &submission("ventilator", "high", 30)).unwrap_err();
    assert_eq!(err, AllocationError::InvalidResourceType("ventilator".to_string()));
    assert!(list_pending(&policy).is_empty());
}

#[test]
fn test_submit_rejects_bad_priority_and_duration() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::fcfs();
    assert!(matches!(
        submit_request(&mgr, &mut policy, &submission("bed", "urgent", 30)),
        Err(AllocationError::InvalidPriority(_))
    ));
    assert_eq!(
        submit_request(&mgr, &mut policy, &submission("bed", "high", 0)),
        Err(AllocationError::InvalidDuration(0))
    );
}

#[test]
fn test_submit_accepts_names_and_numbers() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::priority();
    let first = submit_request(&mgr, &mut policy, &submission("Bed", "4", 30)).unwrap();
    let second = submit_request(&mgr, &mut policy, &submission("doctor", "Critical", 15)).unwrap();
    assert_eq!((first, second), (1, 2));

    let pending = list_pending(&policy);
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].priority, Priority::Critical);
    assert_eq!(pending[1].priority, Priority::Low);
    assert_eq!(pending[0].resource_type, ResourceType::Doctor);
    assert_eq!(pending[0].patient_id, "P-100");
    assert_eq!(pending[0].start_ms, None);
}

#[test]
fn test_run_pass_returns_views() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::fcfs();
    submit_request(&mgr, &mut policy, &submission("bed", "medium", 30)).unwrap();
    submit_request(&mgr, &mut policy, &submission("bed", "medium", 30)).unwrap();

    let views = run_pass(&mgr, &mut policy);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].request_id, 1);
    assert_eq!(views[0].resource_id, "B001");
    assert_eq!(views[0].resource_type, ResourceType::Bed);
    assert_eq!(list_pending(&policy).len(), 1);

    let stats = statistics(&mgr);
    assert_eq!(stats[&ResourceType::Bed].occupied, 1);
    assert!((stats[&ResourceType::Bed].utilization - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_list_resources_reports_status() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::fcfs();
    submit_request(&mgr, &mut policy, &submission("doctor", "high", 10)).unwrap();
    run_pass(&mgr, &mut policy);

    let views = list_resources(&mgr);
    assert_eq!(views.len(), 2);
    let doctor = views.iter().find(|v| v.id == "D001").unwrap();
    assert_eq!(doctor.status, ResourceStatus::Occupied);
    assert_eq!(doctor.attribute.value(), "Cardiology");
    let bed = views.iter().find(|v| v.id == "B001").unwrap();
    assert_eq!(bed.status, ResourceStatus::Available);

    let json = serde_json::to_string(&views).unwrap();
    assert!(json.contains("\"D001\""));
}

#[test]
fn test_expire_returns_released_ids() {
    let mgr = manager();
    let mut policy = SchedulerPolicy::fcfs();
    submit_request(&mgr, &mut policy, &submission("bed", "high", 10)).unwrap();
    run_pass(&mgr, &mut policy);

    assert!(expire(&mgr, now_ms()).is_empty());
    let released = expire(&mgr, now_ms() + minutes_to_ms(11));
    assert_eq!(released, vec!["B001".to_string()]);
    assert!(expire(&mgr, now_ms() + minutes_to_ms(11)).is_empty());
}

#[test]
fn test_health() {
    assert!(health().ok);
}
