//! Online Allocation Engine
//!
//! State machine over the reveal order with per-item states
//! `Pending -> Committed(agent) | Deferred`; no transition ever reverses.
//!
//! # Step protocol
//!
//! For each `(item, track)` in reveal order:
//! 1. The **home agent** (the track's agent) gets first refusal
//! 2. Evaluate the EFX checker against the hypothetical post-commit totals;
//!    commit to the home agent if no direction is violated
//! 3. Otherwise attempt the other agent symmetrically
//! 4. If both attempts violate, record `Deferred`; the item is not retried
//!
//! After every step a trace row is appended with the actual post-step totals,
//! so the full fairness trajectory is auditable even through deferrals.
//!
//! The engine is strictly single-threaded and synchronous: one entry at a
//! time, no suspension points, no I/O in the stepping loop. A run terminates
//! when the reveal order is exhausted and is not resumable across runs.
//!
//! # Example
//!
//! ```rust
//! use efx_simulator_core_rs::{AllocationEngine, ValuationTable};
//!
//! let table = ValuationTable::from_triples(vec![
//!     ("g1", 5, 5),
//!     ("g2", 3, 9),
//! ])
//! .unwrap();
//!
//! let mut engine = AllocationEngine::new(table).unwrap();
//! let summary = engine.run().unwrap();
//!
//! assert_eq!(summary.allocated_count, 2);
//! assert_eq!(summary.assigned_1, vec!["g1".to_string()]);
//! assert_eq!(summary.assigned_2, vec!["g2".to_string()]);
//! ```

use crate::efx;
use crate::ledger::{BundleLedger, LedgerError};
use crate::models::trace::{AllocationOutcome, StepTrace, TraceRow};
use crate::models::valuation::{AgentRole, ValuationTable};
use crate::reveal::{RevealOrder, Track};
use serde::{Deserialize, Serialize};

/// Engine error types
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Internal invalid-state condition (e.g. double commit). Fatal: it
    /// signals a logic defect, not a data problem.
    InvalidState(String),

    /// An item surfaced that the valuation table does not know.
    UnknownItem(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            EngineError::UnknownItem(id) => write!(f, "Unknown item: {}", id),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownItem { item } => EngineError::UnknownItem(item),
            other => EngineError::InvalidState(other.to_string()),
        }
    }
}

/// Result of a single reveal step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Reveal position processed (0-based)
    pub index: usize,

    /// Item revealed at this step
    pub item_id: String,

    /// Originating track
    pub track: Track,

    /// Decision taken for the item
    pub outcome: AllocationOutcome,
}

/// Final state of a completed (or partially stepped) run.
///
/// `allocated_count` is surfaced deliberately: deferral is terminal within a
/// run, so a caller comparing it against `num_items` decides for itself
/// whether unallocated items warrant a second pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Items committed to agent 1, in commit order
    pub assigned_1: Vec<String>,

    /// Items committed to agent 2, in commit order
    pub assigned_2: Vec<String>,

    /// Items deferred (skipped for the remainder of the run)
    pub deferred: Vec<String>,

    /// Total items committed to either agent
    pub allocated_count: usize,

    /// Size of the item universe
    pub num_items: usize,

    /// Agent 1's valuation of its final bundle
    pub self_total_1: i64,

    /// Agent 2's valuation of its final bundle
    pub self_total_2: i64,
}

/// The online allocation engine.
///
/// Owns the reveal order, the bundle ledger and the step trace. The
/// valuation table and reveal order are computed before stepping starts and
/// are read-only thereafter; bundles grow monotonically as the engine
/// advances.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    /// Deterministic release sequence (read-only)
    reveal_order: RevealOrder,

    /// Both bundles plus the valuation table
    ledger: BundleLedger,

    /// One row per processed reveal entry
    trace: StepTrace,

    /// Next reveal position to process
    position: usize,
}

impl AllocationEngine {
    /// Create an engine over a validated valuation table.
    ///
    /// The reveal order is generated here, once; the table is then owned by
    /// the ledger and never modified.
    pub fn new(table: ValuationTable) -> Result<Self, EngineError> {
        let reveal_order = RevealOrder::generate(&table);
        Ok(Self {
            reveal_order,
            ledger: BundleLedger::new(table),
            trace: StepTrace::new(),
            position: 0,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The reveal order driving this run.
    pub fn reveal_order(&self) -> &RevealOrder {
        &self.reveal_order
    }

    /// The bundle ledger (current actual state).
    pub fn ledger(&self) -> &BundleLedger {
        &self.ledger
    }

    /// The step trace recorded so far.
    pub fn trace(&self) -> &StepTrace {
        &self.trace
    }

    /// Next reveal position to process.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the reveal order is exhausted.
    pub fn is_finished(&self) -> bool {
        self.position >= self.reveal_order.len()
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Process the next reveal entry.
    ///
    /// Returns `Ok(None)` once the reveal order is exhausted. Both
    /// hypothetical checks read the same unmutated ledger state; exactly one
    /// of {commit home, commit other, defer} wins per item.
    pub fn step(&mut self) -> Result<Option<StepResult>, EngineError> {
        let entry = match self.reveal_order.entries().get(self.position) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };

        let home = entry.track.home_agent();
        let home_eval = efx::evaluate(&self.ledger.would_add(home, &entry.item_id)?);

        let (outcome, fallback_violated) = if home_eval.holds() {
            self.ledger.commit(home, &entry.item_id)?;
            (Self::outcome_for(home), None)
        } else {
            let other = home.other();
            let other_eval = efx::evaluate(&self.ledger.would_add(other, &entry.item_id)?);
            if other_eval.holds() {
                self.ledger.commit(other, &entry.item_id)?;
                (Self::outcome_for(other), Some(false))
            } else {
                (AllocationOutcome::Deferred, Some(true))
            }
        };

        self.trace.push(TraceRow {
            index: self.position,
            item_id: entry.item_id.clone(),
            track: entry.track,
            outcome,
            home_check_violated: fallback_violated.is_some(),
            fallback_check_violated: fallback_violated,
            totals: self.ledger.totals(),
        });

        let result = StepResult {
            index: self.position,
            item_id: entry.item_id,
            track: entry.track,
            outcome,
        };
        self.position += 1;
        Ok(Some(result))
    }

    /// Drive the engine until the reveal order is exhausted.
    pub fn run(&mut self) -> Result<AllocationSummary, EngineError> {
        while self.step()?.is_some() {}
        Ok(self.summary())
    }

    /// Summary of the allocation as of the current position.
    pub fn summary(&self) -> AllocationSummary {
        let bundle_1 = self.ledger.bundle(AgentRole::Agent1);
        let bundle_2 = self.ledger.bundle(AgentRole::Agent2);
        let deferred: Vec<String> = self
            .trace
            .rows_with_outcome(AllocationOutcome::Deferred)
            .into_iter()
            .map(|row| row.item_id.clone())
            .collect();

        AllocationSummary {
            assigned_1: bundle_1.items().to_vec(),
            assigned_2: bundle_2.items().to_vec(),
            deferred,
            allocated_count: bundle_1.len() + bundle_2.len(),
            num_items: self.ledger.table().len(),
            self_total_1: bundle_1.self_total(),
            self_total_2: bundle_2.self_total(),
        }
    }

    fn outcome_for(agent: AgentRole) -> AllocationOutcome {
        match agent {
            AgentRole::Agent1 => AllocationOutcome::AssignedTo1,
            AgentRole::Agent2 => AllocationOutcome::AssignedTo2,
        }
    }
}
