//! Step trace for run replay and auditing.
//!
//! Every reveal step appends exactly one row, whether the item was committed
//! or deferred. Rows are fixed-shape records (explicit fields, not an
//! open-ended mapping) so that the invariant-check inputs stay statically
//! verifiable. The trace enables:
//! - Auditing (verify EFX held after every commit)
//! - Debugging (see which hypothetical checks failed)
//! - Analysis (fairness trajectory over the run)
//!
//! # Example
//!
//! ```rust
//! use efx_simulator_core_rs::{AllocationEngine, AllocationOutcome, ValuationTable};
//!
//! let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
//! let mut engine = AllocationEngine::new(table).unwrap();
//! engine.run().unwrap();
//!
//! let trace = engine.trace();
//! assert_eq!(trace.len(), 2);
//! assert_eq!(trace.rows()[0].outcome, AllocationOutcome::AssignedTo1);
//! ```

use crate::efx::EfxTotals;
use crate::models::valuation::AgentRole;
use crate::reveal::Track;
use serde::{Deserialize, Serialize};

/// Terminal allocation status of one item.
///
/// Set at most once per item; the three outcome sets partition the item
/// universe at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationOutcome {
    /// Item committed to Agent 1's bundle
    AssignedTo1,

    /// Item committed to Agent 2's bundle
    AssignedTo2,

    /// Both hypothetical commits violated EFX; the item is skipped for the
    /// remainder of the run (terminal, no retry)
    Deferred,
}

impl AllocationOutcome {
    /// The receiving agent, if the item was committed.
    pub fn assigned_to(self) -> Option<AgentRole> {
        match self {
            AllocationOutcome::AssignedTo1 => Some(AgentRole::Agent1),
            AllocationOutcome::AssignedTo2 => Some(AgentRole::Agent2),
            AllocationOutcome::Deferred => None,
        }
    }
}

impl std::fmt::Display for AllocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationOutcome::AssignedTo1 => write!(f, "A1"),
            AllocationOutcome::AssignedTo2 => write!(f, "A2"),
            AllocationOutcome::Deferred => write!(f, "deferred"),
        }
    }
}

/// One row of the step trace.
///
/// Records the reveal entry, the decision, which hypothetical checks were
/// attempted and whether they violated EFX, and the *actual* post-step
/// totals (after the commit, or unchanged on deferral).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Reveal position (0-based)
    pub index: usize,

    /// Item revealed at this step
    pub item_id: String,

    /// Track whose preference ranking surfaced the item
    pub track: Track,

    /// Allocation decision for the item
    pub outcome: AllocationOutcome,

    /// Whether the home agent's hypothetical commit violated EFX
    pub home_check_violated: bool,

    /// Whether the other agent's hypothetical commit violated EFX.
    /// None when the home commit succeeded and no fallback was attempted.
    pub fallback_check_violated: Option<bool>,

    /// Post-step totals and least-favorite values for both directions
    pub totals: EfxTotals,
}

/// Append-only log of trace rows, indexed by reveal position.
///
/// This is a thin wrapper around `Vec<TraceRow>` with convenience queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepTrace {
    rows: Vec<TraceRow>,
}

impl StepTrace {
    /// Create a new empty trace
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row to the trace
    pub fn push(&mut self, row: TraceRow) {
        self.rows.push(row);
    }

    /// Number of rows recorded
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the trace is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in reveal order
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    /// Rows with a specific outcome
    pub fn rows_with_outcome(&self, outcome: AllocationOutcome) -> Vec<&TraceRow> {
        self.rows.iter().filter(|r| r.outcome == outcome).collect()
    }

    /// The row for a specific item, if it was revealed
    pub fn row_for_item(&self, item_id: &str) -> Option<&TraceRow> {
        self.rows.iter().find(|r| r.item_id == item_id)
    }
}
