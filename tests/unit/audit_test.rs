//! Tests for audit sink

use hospital_allocator::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, ResourceType};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(Some(7), "B001", ResourceType::Bed, AuditAction::Grant, 1_000);
    sink.record(event);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].request_id, Some(7));
    assert_eq!(events[0].resource_id, "B001");
    assert_eq!(events[0].action, AuditAction::Grant);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(Some(1), "B001", ResourceType::Bed, AuditAction::Grant, 1));
    sink.record(build_audit_event(Some(2), "B002", ResourceType::Bed, AuditAction::Grant, 2));
    sink.record(build_audit_event(Some(3), "B003", ResourceType::Bed, AuditAction::Grant, 3));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].request_id, Some(2)); // First one popped
    assert_eq!(events[1].request_id, Some(3));
}

#[test]
fn test_clones_share_buffer() {
    let reader = InMemoryAuditSink::new(4);
    let mut writer = reader.clone();
    writer.record(build_audit_event(None, "D001", ResourceType::Doctor, AuditAction::Release, 5));
    assert_eq!(reader.events().len(), 1);
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event(None, "OR001", ResourceType::OperatingRoom, AuditAction::Expire, 42);
    let b = build_audit_event(None, "OR001", ResourceType::OperatingRoom, AuditAction::Expire, 42);

    assert_eq!(a.resource_type, ResourceType::OperatingRoom);
    assert_eq!(a.at_ms, 42);
    assert!(a.created_at_ms > 0);
    assert_ne!(a.event_id, b.event_id);
}
