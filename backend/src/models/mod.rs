//! Domain models for the fair-division simulator

pub mod trace;
pub mod valuation;

// Re-exports
pub use trace::{AllocationOutcome, StepTrace, TraceRow};
pub use valuation::{AgentRole, ItemValuation, ValuationError, ValuationTable};
