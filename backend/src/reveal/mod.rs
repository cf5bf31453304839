//! Reveal-order generation.
//!
//! Items are not known to the allocator upfront: they are released one at a
//! time by interleaving two descending-by-valuation rankings, one per agent.
//! Track 1 walks agent 1's ranking, Track 2 walks agent 2's. At each rank the
//! generator emits the Track 1 candidate first, then the Track 2 candidate,
//! skipping anything already emitted, so every item appears exactly once at
//! its earliest rank across either track.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same valuation table → same reveal order
//! 2. **Fixed tie-break**: Sorts are stable; equal valuations keep the
//!    table's insertion order
//! 3. **Track1 priority**: An item due on both tracks at the same rank is
//!    credited to Track 1
//!
//! A `RevealOrder` is not restartable; build a fresh one to replay.
//!
//! # Example
//!
//! ```
//! use efx_simulator_core_rs::{RevealOrder, Track, ValuationTable};
//!
//! let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
//! let order = RevealOrder::generate(&table);
//!
//! // Agent 1 ranks g1 first, agent 2 ranks g2 first.
//! assert_eq!(order.entries()[0].item_id, "g1");
//! assert_eq!(order.entries()[0].track, Track::Track1);
//! assert_eq!(order.entries()[1].item_id, "g2");
//! assert_eq!(order.entries()[1].track, Track::Track2);
//! ```

use crate::models::valuation::{AgentRole, ValuationTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The preference ranking that surfaced a reveal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    /// Agent 1's descending-valuation ranking
    Track1,

    /// Agent 2's descending-valuation ranking
    Track2,
}

impl Track {
    /// The home agent for items surfaced by this track.
    ///
    /// The home agent gets first refusal on the item; the claim is still
    /// conditional on the EFX check.
    pub fn home_agent(self) -> AgentRole {
        match self {
            Track::Track1 => AgentRole::Agent1,
            Track::Track2 => AgentRole::Agent2,
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Track::Track1 => write!(f, "TM1"),
            Track::Track2 => write!(f, "TM2"),
        }
    }
}

/// One reveal: an item and the track that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealEntry {
    /// Item identifier
    pub item_id: String,

    /// Originating track
    pub track: Track,
}

/// The complete, deterministic release sequence for one run.
///
/// Finite, duplicate-free, computed once before the engine starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealOrder {
    entries: Vec<RevealEntry>,
}

impl RevealOrder {
    /// Generate the reveal order for a valuation table.
    ///
    /// Sorts the item set descending by each agent's valuation (stable, so
    /// ties keep insertion order), then walks both rankings in lock-step by
    /// rank, emitting each unseen item as it comes due. Track 1 is consulted
    /// first at every rank.
    pub fn generate(table: &ValuationTable) -> Self {
        let ranking_1 = ranked_ids(table, AgentRole::Agent1);
        let ranking_2 = ranked_ids(table, AgentRole::Agent2);

        let mut entries = Vec::with_capacity(table.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(table.len());

        for rank in 0..table.len() {
            if seen.insert(ranking_1[rank]) {
                entries.push(RevealEntry {
                    item_id: ranking_1[rank].to_string(),
                    track: Track::Track1,
                });
            }
            if seen.insert(ranking_2[rank]) {
                entries.push(RevealEntry {
                    item_id: ranking_2[rank].to_string(),
                    track: Track::Track2,
                });
            }
        }

        Self { entries }
    }

    /// Entries in release order.
    pub fn entries(&self) -> &[RevealEntry] {
        &self.entries
    }

    /// Number of entries (equals the item count: no duplicates).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the order holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of an item in the release sequence.
    pub fn position(&self, item_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.item_id == item_id)
    }
}

/// Item ids sorted descending by one agent's valuation (stable).
fn ranked_ids(table: &ValuationTable, agent: AgentRole) -> Vec<&str> {
    let mut ids: Vec<&str> = table.items().iter().map(|item| item.id.as_str()).collect();
    ids.sort_by(|a, b| {
        let va = table.value(agent, a).unwrap_or(0);
        let vb = table.value(agent, b).unwrap_or(0);
        vb.cmp(&va)
    });
    ids
}
