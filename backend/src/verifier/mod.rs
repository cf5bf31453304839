//! Exhaustive EFX verifier.
//!
//! Given full knowledge of both valuation tables, enumerate *all* global
//! two-way partitions of the item set that satisfy EFX in both directions
//! using total bundle valuations. The verifier is a batch collaborator: the
//! online engine never calls it, but tests (and the CLI) use it as an oracle
//! to cross-check the engine's final partition or to audit a known-good
//! partition against the reveal order.
//!
//! The decision space is one boolean per item (Agent 1 or Agent 2), so the
//! enumeration walks the full 2^n assignment cube; every assignment is
//! visited exactly once, which subsumes the solution-blocking loop of an
//! iterative constraint solver. An item-count cap keeps the walk bounded.
//!
//! # Example
//!
//! ```
//! use efx_simulator_core_rs::{enumerate_efx_partitions, ValuationTable};
//!
//! let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
//! let partitions = enumerate_efx_partitions(&table).unwrap();
//!
//! // Only the two balanced splits survive; both all-to-one partitions envy.
//! assert_eq!(partitions.len(), 2);
//! ```

use crate::efx::{self, EfxTotals};
use crate::models::valuation::{AgentRole, ValuationTable};
use crate::reveal::RevealOrder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on the item count for exhaustive enumeration (2^n assignments).
pub const MAX_ENUMERABLE_ITEMS: usize = 24;

/// Errors raised by the exhaustive verifier
#[derive(Debug, Error, PartialEq)]
pub enum VerifierError {
    #[error("Item count {count} exceeds exhaustive-search cap {max}")]
    TooManyItems { count: usize, max: usize },

    #[error("Partition covers {assigned} items but the table has {expected}")]
    LengthMismatch { assigned: usize, expected: usize },
}

/// A complete item-to-agent partition, aligned with table insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Receiving agent per item, index-aligned with the table's items
    assignment: Vec<AgentRole>,
}

impl Partition {
    /// Build a partition from an explicit per-item assignment.
    pub fn new(assignment: Vec<AgentRole>) -> Self {
        Self { assignment }
    }

    /// Receiving agent per item, in table order.
    pub fn assignment(&self) -> &[AgentRole] {
        &self.assignment
    }

    /// Number of items covered.
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// True when the partition covers no items.
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// The receiving agent for the item at a table position.
    pub fn agent_at(&self, position: usize) -> Option<AgentRole> {
        self.assignment.get(position).copied()
    }

    /// Item ids assigned to one agent, in table order.
    pub fn items_for<'t>(&self, table: &'t ValuationTable, agent: AgentRole) -> Vec<&'t str> {
        table
            .items()
            .iter()
            .zip(&self.assignment)
            .filter(|(_, &a)| a == agent)
            .map(|(item, _)| item.id.as_str())
            .collect()
    }

    /// The checker inputs implied by this partition over the full item set.
    pub fn totals(&self, table: &ValuationTable) -> EfxTotals {
        let mut totals = EfxTotals::default();
        let mut min_1 = None; // agent 1's least-valued item in agent 2's bundle
        let mut min_2 = None; // agent 2's least-valued item in agent 1's bundle

        for (item, &agent) in table.items().iter().zip(&self.assignment) {
            match agent {
                AgentRole::Agent1 => {
                    totals.self_total_1 += item.value_1;
                    totals.cross_total_2 += item.value_2;
                    min_2 = Some(min_2.map_or(item.value_2, |m: i64| m.min(item.value_2)));
                }
                AgentRole::Agent2 => {
                    totals.self_total_2 += item.value_2;
                    totals.cross_total_1 += item.value_1;
                    min_1 = Some(min_1.map_or(item.value_1, |m: i64| m.min(item.value_1)));
                }
            }
        }

        totals.least_fav_1 = min_1.unwrap_or(0);
        totals.least_fav_2 = min_2.unwrap_or(0);
        totals
    }

    /// Whether this partition matches a final allocation's two bundles.
    ///
    /// Item order within a bundle is irrelevant; only membership counts.
    /// Returns false if the allocation left items deferred (a partial
    /// allocation is not a partition).
    pub fn matches_bundles(
        &self,
        table: &ValuationTable,
        assigned_1: &[String],
        assigned_2: &[String],
    ) -> bool {
        if assigned_1.len() + assigned_2.len() != self.assignment.len() {
            return false;
        }
        assigned_1
            .iter()
            .all(|id| table.position(id).and_then(|p| self.agent_at(p)) == Some(AgentRole::Agent1))
            && assigned_2.iter().all(|id| {
                table.position(id).and_then(|p| self.agent_at(p)) == Some(AgentRole::Agent2)
            })
    }
}

/// Whether a partition satisfies both global EFX directions.
pub fn is_globally_efx(table: &ValuationTable, partition: &Partition) -> bool {
    partition.len() == table.len() && efx::evaluate(&partition.totals(table)).holds()
}

/// Enumerate every globally EFX two-way partition of the item set.
///
/// Returns partitions in ascending assignment-cube order (all-to-Agent1
/// first). The empty-to-one-side partitions are included whenever they
/// satisfy EFX — the caller filters if it wants balanced splits only.
///
/// # Errors
/// `TooManyItems` when the table exceeds [`MAX_ENUMERABLE_ITEMS`].
pub fn enumerate_efx_partitions(
    table: &ValuationTable,
) -> Result<Vec<Partition>, VerifierError> {
    let n = table.len();
    if n > MAX_ENUMERABLE_ITEMS {
        return Err(VerifierError::TooManyItems {
            count: n,
            max: MAX_ENUMERABLE_ITEMS,
        });
    }

    let mut solutions = Vec::new();
    for mask in 0u64..(1u64 << n) {
        let assignment: Vec<AgentRole> = (0..n)
            .map(|i| {
                if mask & (1 << i) == 0 {
                    AgentRole::Agent1
                } else {
                    AgentRole::Agent2
                }
            })
            .collect();
        let partition = Partition::new(assignment);
        if is_globally_efx(table, &partition) {
            solutions.push(partition);
        }
    }
    Ok(solutions)
}

/// Audit a known partition against a reveal order, prefix by prefix.
///
/// Replays the partition along the reveal order, checking EFX over the items
/// revealed so far after each step. Returns the first step index (0-based)
/// at which the partial allocation violates EFX, or `None` if every prefix
/// holds. A globally EFX partition can still fail here: global feasibility
/// does not imply every reveal-order prefix is fair.
///
/// # Errors
/// `LengthMismatch` when the partition does not cover the table.
pub fn audit_prefixes(
    table: &ValuationTable,
    order: &RevealOrder,
    partition: &Partition,
) -> Result<Option<usize>, VerifierError> {
    if partition.len() != table.len() {
        return Err(VerifierError::LengthMismatch {
            assigned: partition.len(),
            expected: table.len(),
        });
    }

    let mut totals = EfxTotals::default();
    let mut min_1 = None;
    let mut min_2 = None;

    for (step, entry) in order.entries().iter().enumerate() {
        let position = table
            .position(&entry.item_id)
            .expect("reveal order and table share the item universe");
        let item = &table.items()[position];

        match partition.agent_at(position).expect("length checked above") {
            AgentRole::Agent1 => {
                totals.self_total_1 += item.value_1;
                totals.cross_total_2 += item.value_2;
                min_2 = Some(min_2.map_or(item.value_2, |m: i64| m.min(item.value_2)));
            }
            AgentRole::Agent2 => {
                totals.self_total_2 += item.value_2;
                totals.cross_total_1 += item.value_1;
                min_1 = Some(min_1.map_or(item.value_1, |m: i64| m.min(item.value_1)));
            }
        }
        totals.least_fav_1 = min_1.unwrap_or(0);
        totals.least_fav_2 = min_2.unwrap_or(0);

        if efx::evaluate(&totals).violated() {
            return Ok(Some(step));
        }
    }
    Ok(None)
}
