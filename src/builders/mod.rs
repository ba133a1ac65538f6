//! Builders to construct allocator components from configuration.

pub mod allocator_builder;

pub use allocator_builder::{build_allocator, build_policy, default_inventory, seed_inventory, Allocator};
