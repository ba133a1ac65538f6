//! Allocator configuration structures.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scheduler::round_robin::DEFAULT_QUANTUM_MINUTES;

/// Scheduling policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PolicyConfig {
    /// First-come-first-served.
    Fcfs,
    /// Strict priority.
    Priority,
    /// Round-robin with a quantum in minutes.
    RoundRobin {
        /// Minutes per slice.
        #[serde(default = "default_quantum")]
        quantum_minutes: u32,
    },
}

const fn default_quantum() -> u32 {
    DEFAULT_QUANTUM_MINUTES
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Fcfs
    }
}

/// Initial resource inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Number of beds.
    pub beds: u32,
    /// Number of doctors.
    pub doctors: u32,
    /// Number of operating rooms.
    pub operating_rooms: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            beds: 10,
            doctors: 8,
            operating_rooms: 5,
        }
    }
}

/// Root allocator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Scheduling policy.
    pub policy: PolicyConfig,
    /// Initial inventory.
    pub inventory: InventoryConfig,
    /// Audit buffer size; 0 disables auditing.
    pub audit_capacity: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            inventory: InventoryConfig::default(),
            audit_capacity: 0,
        }
    }
}

impl PolicyConfig {
    /// Validate policy parameters.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::RoundRobin { quantum_minutes: 0 } => {
                Err("quantum_minutes must be greater than 0".into())
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for PolicyConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "priority" => Ok(Self::Priority),
            "round_robin" | "rr" => Ok(Self::RoundRobin {
                quantum_minutes: DEFAULT_QUANTUM_MINUTES,
            }),
            other => Err(format!("unknown policy `{other}`")),
        }
    }
}

impl AllocatorConfig {
    /// Validate the policy and ensure at least one resource is configured.
    pub fn validate(&self) -> Result<(), String> {
        self.policy
            .validate()
            .map_err(|e| format!("policy invalid: {e}"))?;
        let inv = &self.inventory;
        if inv.beds == 0 && inv.doctors == 0 && inv.operating_rooms == 0 {
            return Err("inventory must contain at least one resource".into());
        }
        Ok(())
    }

    /// Parse allocator configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `ALLOCATOR_*` environment variables, loading a
    /// `.env` file first if present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>, String> {
            raw.map(|v| {
                v.trim()
                    .parse::<T>()
                    .map_err(|_| format!("{key}: cannot parse `{v}`"))
            })
            .transpose()
        }

        let mut cfg = Self::default();
        if let Some(raw) = lookup("ALLOCATOR_POLICY") {
            cfg.policy = raw.parse()?;
        }
        if let Some(q) = parse::<u32>("ALLOCATOR_QUANTUM_MINUTES", lookup("ALLOCATOR_QUANTUM_MINUTES"))? {
            match &mut cfg.policy {
                PolicyConfig::RoundRobin { quantum_minutes } => *quantum_minutes = q,
                _ => tracing::warn!("ALLOCATOR_QUANTUM_MINUTES ignored for non round-robin policy"),
            }
        }
        if let Some(n) = parse("ALLOCATOR_BEDS", lookup("ALLOCATOR_BEDS"))? {
            cfg.inventory.beds = n;
        }
        if let Some(n) = parse("ALLOCATOR_DOCTORS", lookup("ALLOCATOR_DOCTORS"))? {
            cfg.inventory.doctors = n;
        }
        if let Some(n) = parse("ALLOCATOR_OPERATING_ROOMS", lookup("ALLOCATOR_OPERATING_ROOMS"))? {
            cfg.inventory.operating_rooms = n;
        }
        if let Some(n) = parse("ALLOCATOR_AUDIT_CAPACITY", lookup("ALLOCATOR_AUDIT_CAPACITY"))? {
            cfg.audit_capacity = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
