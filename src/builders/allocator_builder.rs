//! Compose registry, manager and policy from an [`AllocatorConfig`].

use std::sync::Arc;

use crate::config::{AllocatorConfig, InventoryConfig, PolicyConfig};
use crate::core::{AllocationError, AllocationManager, InMemoryAuditSink, Resource, ResourceRegistry};
use crate::scheduler::{Scheduler, SchedulerPolicy};

const SPECIALIZATIONS: [&str; 6] = [
    "Cardiology",
    "Neurology",
    "Orthopedics",
    "General Practice",
    "Emergency Medicine",
    "Surgery",
];

const EQUIPMENT_LEVELS: [&str; 3] = ["Advanced", "Standard", "Basic"];

/// A ready-to-use allocator: shared manager plus its policy.
pub struct Allocator {
    /// Manager over the seeded registry.
    pub manager: Arc<AllocationManager>,
    /// Configured policy.
    pub policy: SchedulerPolicy,
    /// Audit buffer, when `audit_capacity > 0`.
    pub audit: Option<InMemoryAuditSink>,
}

/// Default hospital inventory: beds split ICU / General / Emergency,
/// doctors cycling through specializations, operating rooms cycling
/// through equipment levels.
pub fn default_inventory(inventory: &InventoryConfig) -> Vec<Resource> {
    let beds = inventory.beds;
    let bed_iter = (1..=beds).map(move |i| {
        let department = if i * 10 <= beds * 3 {
            "ICU"
        } else if i * 10 <= beds * 7 {
            "General"
        } else {
            "Emergency"
        };
        Resource::bed(format!("B{i:03}"), format!("Bed {i}"), department)
    });

    let doctor_iter = (1..=inventory.doctors).map(|i| {
        let name = u8::try_from(i - 1)
            .ok()
            .filter(|n| *n < 26)
            .map_or_else(|| format!("Dr. {i}"), |n| format!("Dr. {}", char::from(b'A' + n)));
        let specialization = SPECIALIZATIONS[(i as usize - 1) % SPECIALIZATIONS.len()];
        Resource::doctor(format!("D{i:03}"), name, specialization)
    });

    let room_iter = (1..=inventory.operating_rooms).map(|i| {
        let level = EQUIPMENT_LEVELS[(i as usize - 1) % EQUIPMENT_LEVELS.len()];
        Resource::operating_room(format!("OR{i:03}"), format!("OR {i}"), level)
    });

    bed_iter.chain(doctor_iter).chain(room_iter).collect()
}

/// Add the default inventory to `registry`. Returns the number added.
pub fn seed_inventory(registry: &ResourceRegistry, inventory: &InventoryConfig) -> usize {
    let resources = default_inventory(inventory);
    let count = resources.len();
    for resource in resources {
        registry.add_resource(resource);
    }
    count
}

/// Instantiate the configured policy.
pub fn build_policy(cfg: &PolicyConfig) -> Result<SchedulerPolicy, AllocationError> {
    match *cfg {
        PolicyConfig::Fcfs => Ok(SchedulerPolicy::fcfs()),
        PolicyConfig::Priority => Ok(SchedulerPolicy::priority()),
        PolicyConfig::RoundRobin { quantum_minutes } => SchedulerPolicy::round_robin(quantum_minutes),
    }
}

/// Build a seeded allocator from configuration.
pub fn build_allocator(cfg: &AllocatorConfig) -> Result<Allocator, AllocationError> {
    cfg.validate().map_err(|e| {
        tracing::warn!(error = %e, "allocator config rejected");
        AllocationError::InvalidConfig(e)
    })?;

    let registry = Arc::new(ResourceRegistry::new());
    let seeded = seed_inventory(&registry, &cfg.inventory);
    let policy = build_policy(&cfg.policy)?;

    let mut manager = AllocationManager::new(registry);
    let audit = (cfg.audit_capacity > 0).then(|| InMemoryAuditSink::new(cfg.audit_capacity));
    if let Some(sink) = &audit {
        manager = manager.with_audit(Box::new(sink.clone()));
    }

    tracing::info!(policy = policy.name(), resources = seeded, "allocator built");
    Ok(Allocator {
        manager: Arc::new(manager),
        policy,
        audit,
    })
}

