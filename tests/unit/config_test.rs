//! Tests for configuration

use std::collections::HashMap;

use hospital_allocator::config::{AllocatorConfig, InventoryConfig, PolicyConfig};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_default_config_is_valid() {
    let cfg = AllocatorConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.policy, PolicyConfig::Fcfs);
    assert_eq!(
        cfg.inventory,
        InventoryConfig {
            beds: 10,
            doctors: 8,
            operating_rooms: 5
        }
    );
    assert_eq!(cfg.audit_capacity, 0);
}

#[test]
fn test_zero_quantum_rejected() {
    let cfg = AllocatorConfig {
        policy: PolicyConfig::RoundRobin { quantum_minutes: 0 },
        ..Default::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("quantum_minutes"));
}

#[test]
fn test_empty_inventory_rejected() {
    let cfg = AllocatorConfig {
        inventory: InventoryConfig {
            beds: 0,
            doctors: 0,
            operating_rooms: 0,
        },
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_from_json_str() {
    let cfg = AllocatorConfig::from_json_str(
        r#"{"policy":{"kind":"round_robin","quantum_minutes":20},"inventory":{"beds":4}}"#,
    )
    .unwrap();
    assert_eq!(cfg.policy, PolicyConfig::RoundRobin { quantum_minutes: 20 });
    assert_eq!(cfg.inventory.beds, 4);
    assert_eq!(cfg.inventory.doctors, 8);
}

#[test]
fn test_from_json_str_default_quantum() {
    let cfg = AllocatorConfig::from_json_str(r#"{"policy":{"kind":"round_robin"}}"#).unwrap();
    assert_eq!(cfg.policy, PolicyConfig::RoundRobin { quantum_minutes: 30 });
}

#[test]
fn test_from_json_str_rejects_garbage() {
    let err = AllocatorConfig::from_json_str("{not json").unwrap_err();
    assert!(err.starts_with("parse error"));
    assert!(AllocatorConfig::from_json_str(r#"{"policy":{"kind":"lottery"}}"#).is_err());
}

#[test]
fn test_from_lookup_overrides() {
    let cfg = AllocatorConfig::from_lookup(lookup(&[
        ("ALLOCATOR_POLICY", "round-robin"),
        ("ALLOCATOR_QUANTUM_MINUTES", "15"),
        ("ALLOCATOR_BEDS", "3"),
        ("ALLOCATOR_AUDIT_CAPACITY", "64"),
    ]))
    .unwrap();
    assert_eq!(cfg.policy, PolicyConfig::RoundRobin { quantum_minutes: 15 });
    assert_eq!(cfg.inventory.beds, 3);
    assert_eq!(cfg.inventory.doctors, 8);
    assert_eq!(cfg.audit_capacity, 64);
}

#[test]
fn test_from_lookup_empty_uses_defaults() {
    let cfg = AllocatorConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, AllocatorConfig::default());
}

#[test]
fn test_from_lookup_rejects_bad_values() {
    assert!(AllocatorConfig::from_lookup(lookup(&[("ALLOCATOR_BEDS", "many")])).is_err());
    assert!(AllocatorConfig::from_lookup(lookup(&[("ALLOCATOR_POLICY", "lottery")])).is_err());
    assert!(AllocatorConfig::from_lookup(lookup(&[
        ("ALLOCATOR_POLICY", "rr"),
        ("ALLOCATOR_QUANTUM_MINUTES", "0"),
    ]))
    .is_err());
}

#[test]
fn test_policy_from_str() {
    assert_eq!("FCFS".parse::<PolicyConfig>(), Ok(PolicyConfig::Fcfs));
    assert_eq!(" priority ".parse::<PolicyConfig>(), Ok(PolicyConfig::Priority));
    assert!("".parse::<PolicyConfig>().is_err());
}
