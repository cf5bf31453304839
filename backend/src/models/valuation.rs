//! Valuation table model
//!
//! The shared item universe and both agents' private valuations over it.
//! Each item carries an opaque string identifier plus one non-negative i64
//! valuation per agent. The table is built once, validated up front, and
//! read-only for the remainder of a run.
//!
//! CRITICAL: All valuations are i64 minor units

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// One of the two agents in the bilateral division.
///
/// The design is deliberately bilateral; there is no agent collection to
/// iterate, just the two roles and their mirror images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// First agent ("Alice" in the classic formulation)
    Agent1,

    /// Second agent ("Bob")
    Agent2,
}

impl AgentRole {
    /// The opposing agent.
    ///
    /// # Example
    /// ```
    /// use efx_simulator_core_rs::AgentRole;
    ///
    /// assert_eq!(AgentRole::Agent1.other(), AgentRole::Agent2);
    /// assert_eq!(AgentRole::Agent2.other(), AgentRole::Agent1);
    /// ```
    pub fn other(self) -> Self {
        match self {
            AgentRole::Agent1 => AgentRole::Agent2,
            AgentRole::Agent2 => AgentRole::Agent1,
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Agent1 => write!(f, "A1"),
            AgentRole::Agent2 => write!(f, "A2"),
        }
    }
}

/// Errors raised while building a valuation table
#[derive(Debug, Error, PartialEq)]
pub enum ValuationError {
    #[error("Item set must not be empty")]
    EmptyItemSet,

    #[error("Negative valuation {value} for item {item} ({agent})")]
    NegativeValuation {
        item: String,
        agent: AgentRole,
        value: i64,
    },

    #[error("Duplicate item id: {item}")]
    DuplicateItem { item: String },
}

/// A single item's identifier and both agents' valuations of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemValuation {
    /// Opaque item identifier (e.g., "g1")
    pub id: String,

    /// Agent 1's valuation (i64 minor units, non-negative)
    pub value_1: i64,

    /// Agent 2's valuation (i64 minor units, non-negative)
    pub value_2: i64,
}

impl ItemValuation {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, value_1: i64, value_2: i64) -> Self {
        Self {
            id: id.into(),
            value_1,
            value_2,
        }
    }

    /// The given agent's valuation of this item.
    pub fn value_for(&self, agent: AgentRole) -> i64 {
        match agent {
            AgentRole::Agent1 => self.value_1,
            AgentRole::Agent2 => self.value_2,
        }
    }
}

/// Immutable table of per-item valuations for both agents
///
/// Items keep their insertion order; that order is the documented tie-break
/// for the reveal-order sorts. Lookup by id is O(1) via an internal index.
///
/// # Example
/// ```
/// use efx_simulator_core_rs::{AgentRole, ItemValuation, ValuationTable};
///
/// let table = ValuationTable::new(vec![
///     ItemValuation::new("g1", 5, 5),
///     ItemValuation::new("g2", 3, 9),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.value(AgentRole::Agent2, "g2"), Some(9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemValuation>", into = "Vec<ItemValuation>")]
pub struct ValuationTable {
    /// Items in insertion order
    items: Vec<ItemValuation>,

    /// Item id -> position in `items`
    index: HashMap<String, usize>,
}

impl TryFrom<Vec<ItemValuation>> for ValuationTable {
    type Error = ValuationError;

    fn try_from(items: Vec<ItemValuation>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<ValuationTable> for Vec<ItemValuation> {
    fn from(table: ValuationTable) -> Self {
        table.items
    }
}

impl ValuationTable {
    /// Build a table, rejecting invalid input before any reveal order exists.
    ///
    /// # Errors
    /// - `EmptyItemSet` if `items` is empty
    /// - `NegativeValuation` if any valuation is below zero
    /// - `DuplicateItem` if an id appears twice
    pub fn new(items: Vec<ItemValuation>) -> Result<Self, ValuationError> {
        if items.is_empty() {
            return Err(ValuationError::EmptyItemSet);
        }

        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            for agent in [AgentRole::Agent1, AgentRole::Agent2] {
                let value = item.value_for(agent);
                if value < 0 {
                    return Err(ValuationError::NegativeValuation {
                        item: item.id.clone(),
                        agent,
                        value,
                    });
                }
            }
            if index.insert(item.id.clone(), pos).is_some() {
                return Err(ValuationError::DuplicateItem {
                    item: item.id.clone(),
                });
            }
        }

        Ok(Self { items, index })
    }

    /// Build from `(id, value_1, value_2)` triples.
    pub fn from_triples<I, S>(triples: I) -> Result<Self, ValuationError>
    where
        I: IntoIterator<Item = (S, i64, i64)>,
        S: Into<String>,
    {
        Self::new(
            triples
                .into_iter()
                .map(|(id, v1, v2)| ItemValuation::new(id, v1, v2))
                .collect(),
        )
    }

    /// Number of items in the universe.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the table holds no items (never true for a validated table).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[ItemValuation] {
        &self.items
    }

    /// Whether an item id exists in the table.
    pub fn contains(&self, item_id: &str) -> bool {
        self.index.contains_key(item_id)
    }

    /// Look up one item by id.
    pub fn get(&self, item_id: &str) -> Option<&ItemValuation> {
        self.index.get(item_id).map(|&pos| &self.items[pos])
    }

    /// Position of an item in insertion order.
    pub fn position(&self, item_id: &str) -> Option<usize> {
        self.index.get(item_id).copied()
    }

    /// The given agent's valuation of the given item.
    pub fn value(&self, agent: AgentRole, item_id: &str) -> Option<i64> {
        self.get(item_id).map(|item| item.value_for(agent))
    }
}
