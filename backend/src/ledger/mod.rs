//! Bundle ledger
//!
//! Owns the two agents' bundles and the valuation table, and is the single
//! source of truth for every total the invariant checker consumes.
//!
//! Totals are always recomputed by summation over the live item set, never
//! kept as independently-updated running sums. Two code paths incrementing
//! the same quantity can drift apart; recomputation makes that class of bug
//! unrepresentable.
//!
//! Opponent-view quantities (`cross_total`, `least_fav`) are derived on
//! demand from the bundles and the table; they are not stored.
//!
//! CRITICAL: All valuations are i64 minor units

use crate::efx::EfxTotals;
use crate::models::valuation::{AgentRole, ValuationTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// Committing an item that already sits in a bundle. A programmer error:
    /// each item may be allocated at most once, so this is fatal to the run.
    #[error("Item {item} already committed to {owner}")]
    DoubleCommit { item: String, owner: AgentRole },

    /// Item id not present in the valuation table.
    #[error("Unknown item: {item}")]
    UnknownItem { item: String },
}

/// One agent's bundle: owned items plus the cached self-valuation total.
///
/// Grow-only; items are only ever added. `self_total` is recomputed from the
/// item set on every mutation and therefore always equals
/// `Σ value(owner, i) for i in items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    /// Owning agent
    owner: AgentRole,

    /// Item ids in commit order (membership unique)
    items: Vec<String>,

    /// Owner's valuation of the bundle (recomputed, never incremented)
    self_total: i64,
}

impl Bundle {
    fn new(owner: AgentRole) -> Self {
        Self {
            owner,
            items: Vec::new(),
            self_total: 0,
        }
    }

    /// Owning agent
    pub fn owner(&self) -> AgentRole {
        self.owner
    }

    /// Item ids in commit order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items owned
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the bundle holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the bundle contains an item
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i == item_id)
    }

    /// Owner's valuation of the bundle
    pub fn self_total(&self) -> i64 {
        self.self_total
    }
}

/// Both bundles plus the (read-only) valuation table.
///
/// # Example
/// ```
/// use efx_simulator_core_rs::{AgentRole, BundleLedger, ValuationTable};
///
/// let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
/// let mut ledger = BundleLedger::new(table);
///
/// ledger.commit(AgentRole::Agent1, "g1").unwrap();
/// assert_eq!(ledger.bundle(AgentRole::Agent1).self_total(), 5);
/// assert_eq!(ledger.cross_total(AgentRole::Agent2), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLedger {
    table: ValuationTable,
    bundle_1: Bundle,
    bundle_2: Bundle,
}

impl BundleLedger {
    /// Create a ledger with two empty bundles over the given table.
    pub fn new(table: ValuationTable) -> Self {
        Self {
            table,
            bundle_1: Bundle::new(AgentRole::Agent1),
            bundle_2: Bundle::new(AgentRole::Agent2),
        }
    }

    /// The valuation table this ledger operates over.
    pub fn table(&self) -> &ValuationTable {
        &self.table
    }

    /// One agent's bundle.
    pub fn bundle(&self, agent: AgentRole) -> &Bundle {
        match agent {
            AgentRole::Agent1 => &self.bundle_1,
            AgentRole::Agent2 => &self.bundle_2,
        }
    }

    /// The bundle currently holding an item, if any.
    pub fn owner_of(&self, item_id: &str) -> Option<AgentRole> {
        if self.bundle_1.contains(item_id) {
            Some(AgentRole::Agent1)
        } else if self.bundle_2.contains(item_id) {
            Some(AgentRole::Agent2)
        } else {
            None
        }
    }

    /// `viewer`'s valuation of the opposing bundle.
    pub fn cross_total(&self, viewer: AgentRole) -> i64 {
        self.sum_for(viewer, self.bundle(viewer.other()).items())
    }

    /// `viewer`'s least-valued item within the opposing bundle (0 if empty).
    pub fn least_fav(&self, viewer: AgentRole) -> i64 {
        self.min_for(viewer, self.bundle(viewer.other()).items())
    }

    /// The six checker inputs for the current (actual) state.
    pub fn totals(&self) -> EfxTotals {
        EfxTotals {
            self_total_1: self.bundle_1.self_total(),
            cross_total_1: self.cross_total(AgentRole::Agent1),
            least_fav_1: self.least_fav(AgentRole::Agent1),
            self_total_2: self.bundle_2.self_total(),
            cross_total_2: self.cross_total(AgentRole::Agent2),
            least_fav_2: self.least_fav(AgentRole::Agent2),
        }
    }

    /// Totals *as if* `item_id` were added to `agent`'s bundle.
    ///
    /// Pure: no mutation, the real bundles are untouched regardless of what
    /// the caller does with the snapshot.
    ///
    /// # Errors
    /// - `UnknownItem` if the id is not in the table
    /// - `DoubleCommit` if the item already sits in either bundle
    pub fn would_add(&self, agent: AgentRole, item_id: &str) -> Result<EfxTotals, LedgerError> {
        self.check_committable(item_id)?;

        let mut totals = self.totals();
        let own_value = self.value(agent, item_id);
        let opp = agent.other();
        let opp_value = self.value(opp, item_id);
        let grown_min = if self.bundle(agent).is_empty() {
            opp_value
        } else {
            self.least_fav(opp).min(opp_value)
        };

        match agent {
            AgentRole::Agent1 => {
                totals.self_total_1 += own_value;
                totals.cross_total_2 += opp_value;
                totals.least_fav_2 = grown_min;
            }
            AgentRole::Agent2 => {
                totals.self_total_2 += own_value;
                totals.cross_total_1 += opp_value;
                totals.least_fav_1 = grown_min;
            }
        }

        Ok(totals)
    }

    /// Append `item_id` to `agent`'s bundle and recompute its total.
    ///
    /// # Errors
    /// Same conditions as [`BundleLedger::would_add`]; a `DoubleCommit` here
    /// signals an engine defect, not a data problem.
    pub fn commit(&mut self, agent: AgentRole, item_id: &str) -> Result<(), LedgerError> {
        self.check_committable(item_id)?;

        let items: Vec<String> = {
            let bundle = self.bundle(agent);
            let mut items = bundle.items().to_vec();
            items.push(item_id.to_string());
            items
        };
        let self_total = self.sum_for(agent, &items);

        let bundle = match agent {
            AgentRole::Agent1 => &mut self.bundle_1,
            AgentRole::Agent2 => &mut self.bundle_2,
        };
        bundle.items = items;
        bundle.self_total = self_total;
        Ok(())
    }

    fn check_committable(&self, item_id: &str) -> Result<(), LedgerError> {
        if !self.table.contains(item_id) {
            return Err(LedgerError::UnknownItem {
                item: item_id.to_string(),
            });
        }
        if let Some(owner) = self.owner_of(item_id) {
            return Err(LedgerError::DoubleCommit {
                item: item_id.to_string(),
                owner,
            });
        }
        Ok(())
    }

    fn value(&self, agent: AgentRole, item_id: &str) -> i64 {
        self.table.value(agent, item_id).unwrap_or(0)
    }

    fn sum_for(&self, viewer: AgentRole, items: &[String]) -> i64 {
        items.iter().map(|id| self.value(viewer, id)).sum()
    }

    fn min_for(&self, viewer: AgentRole, items: &[String]) -> i64 {
        items
            .iter()
            .map(|id| self.value(viewer, id))
            .min()
            .unwrap_or(0)
    }
}
