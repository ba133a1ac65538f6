//! Resource model: typed, mutually-exclusive hospital resources.
//!
//! A [`Resource`] is never cloned. Registry pools, allocation records and
//! requests share it through `Arc`/`Weak`, so the claim flag and status are
//! owned by exactly one value.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::AllocationError;

/// Closed set of resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Hospital bed.
    Bed,
    /// Physician.
    Doctor,
    /// Operating room.
    OperatingRoom,
}

impl ResourceType {
    /// Every resource type, in display order.
    pub const ALL: [Self; 3] = [Self::Bed, Self::Doctor, Self::OperatingRoom];

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bed => "Bed",
            Self::Doctor => "Doctor",
            Self::OperatingRoom => "Operating Room",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceType {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "bed" => Ok(Self::Bed),
            "doctor" => Ok(Self::Doctor),
            "operatingroom" | "or" => Ok(Self::OperatingRoom),
            _ => Err(AllocationError::InvalidResourceType(s.to_string())),
        }
    }
}

/// Lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Free to be claimed by a scheduling pass.
    Available,
    /// Held by exactly one active allocation.
    Occupied,
    /// Out of service; never offered to schedulers.
    Maintenance,
}

impl ResourceStatus {
    const fn to_u8(self) -> u8 {
        match self {
            Self::Available => 0,
            Self::Occupied => 1,
            Self::Maintenance => 2,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Available,
            1 => Self::Occupied,
            _ => Self::Maintenance,
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::Maintenance => "Maintenance",
        })
    }
}

/// Type-specific attribute; the variant determines the resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAttribute {
    /// Ward a bed belongs to.
    Department(String),
    /// Physician specialization.
    Specialization(String),
    /// Operating room equipment level.
    EquipmentLevel(String),
}

impl ResourceAttribute {
    /// Resource type implied by this attribute.
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            Self::Department(_) => ResourceType::Bed,
            Self::Specialization(_) => ResourceType::Doctor,
            Self::EquipmentLevel(_) => ResourceType::OperatingRoom,
        }
    }

    /// Attribute value.
    pub fn value(&self) -> &str {
        match self {
            Self::Department(v) | Self::Specialization(v) | Self::EquipmentLevel(v) => v,
        }
    }
}

/// A scarce resource with an exclusive, non-blocking claim flag.
#[derive(Debug)]
pub struct Resource {
    id: String,
    name: String,
    attribute: ResourceAttribute,
    status: AtomicU8,
    claimed: AtomicBool,
}

impl Resource {
    /// Create an Available resource.
    pub fn new(id: impl Into<String>, name: impl Into<String>, attribute: ResourceAttribute) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attribute,
            status: AtomicU8::new(ResourceStatus::Available.to_u8()),
            claimed: AtomicBool::new(false),
        }
    }

    /// Create a bed in `department`.
    pub fn bed(id: impl Into<String>, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self::new(id, name, ResourceAttribute::Department(department.into()))
    }

    /// Create a doctor with a specialization.
    pub fn doctor(
        id: impl Into<String>,
        name: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ResourceAttribute::Specialization(specialization.into()))
    }

    /// Create an operating room with an equipment level.
    pub fn operating_room(
        id: impl Into<String>,
        name: impl Into<String>,
        equipment_level: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ResourceAttribute::EquipmentLevel(equipment_level.into()))
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource type, derived from the attribute.
    pub const fn resource_type(&self) -> ResourceType {
        self.attribute.resource_type()
    }

    /// Type-specific attribute.
    pub const fn attribute(&self) -> &ResourceAttribute {
        &self.attribute
    }

    /// Current status.
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Overwrite the status.
    pub(crate) fn set_status(&self, status: ResourceStatus) {
        self.status.store(status.to_u8(), Ordering::Release);
    }

    /// Move from `from` to `to` only if the current status is `from`.
    pub(crate) fn transition(&self, from: ResourceStatus, to: ResourceStatus) -> bool {
        self.status
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// True when Available and unclaimed.
    pub fn is_available(&self) -> bool {
        self.status() == ResourceStatus::Available && !self.is_claimed()
    }

    /// Whether the claim flag is currently held.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Non-blocking exclusive claim. Returns `false` immediately if someone
    /// else holds it.
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Drop the claim. No-op when unclaimed.
    pub(crate) fn unclaim(&self) {
        self.claimed.store(false, Ordering::Release);
    }
}
