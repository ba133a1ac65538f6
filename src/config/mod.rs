//! Configuration models for policies and inventory.

pub mod allocator;

pub use allocator::{AllocatorConfig, InventoryConfig, PolicyConfig};
