//! EFX Simulator Core - Rust Engine
//!
//! Online fair-division simulator for two agents under the EFX criterion
//! (envy-free up to any item), with deterministic execution.
//!
//! # Architecture
//!
//! - **models**: Domain types (ValuationTable, StepTrace)
//! - **reveal**: Deterministic reveal-order generation
//! - **ledger**: Per-agent bundle state and hypothetical snapshots
//! - **efx**: The EFX invariant checker (pure predicate)
//! - **engine**: Online allocation loop
//! - **scenario**: Seeded random valuation tables
//! - **verifier**: Exhaustive search for all globally EFX partitions
//! - **report**: Run reports, trace digests, table rendering
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All valuations are i64 minor units
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Every commit is checked against the EFX invariant before mutation
//! 4. Bundle totals are recomputed from the item set, never drifted

// Module declarations
pub mod efx;
pub mod engine;
pub mod ledger;
pub mod models;
pub mod report;
pub mod reveal;
pub mod rng;
pub mod scenario;
pub mod verifier;

// Re-exports for convenience
pub use efx::{evaluate, EfxEvaluation, EfxTotals};
pub use engine::{AllocationEngine, AllocationSummary, EngineError, StepResult};
pub use ledger::{Bundle, BundleLedger, LedgerError};
pub use models::{
    trace::{AllocationOutcome, StepTrace, TraceRow},
    valuation::{AgentRole, ItemValuation, ValuationError, ValuationTable},
};
pub use report::{render_table, RunReport};
pub use reveal::{RevealEntry, RevealOrder, Track};
pub use rng::RngManager;
pub use scenario::ScenarioConfig;
pub use verifier::{
    audit_prefixes, enumerate_efx_partitions, is_globally_efx, Partition, VerifierError,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn efx_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engine::PyAllocationEngine>()?;
    Ok(())
}
