//! Online allocation engine - main stepping loop
//!
//! Drives the reveal order through the bundle ledger, consulting the EFX
//! checker on every step.
//!
//! See `allocator.rs` for the full implementation.

pub mod allocator;

// Re-export main types for convenience
pub use allocator::{AllocationEngine, AllocationSummary, EngineError, StepResult};
