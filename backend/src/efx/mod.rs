//! EFX invariant checker.
//!
//! EFX (envy-free up to any item) holds between two bundles iff, for both
//! orderings (X, Y) of the agents:
//!
//! ```text
//! self_total(X) >= cross_total(X, Y) - least_fav(X, Y)
//! ```
//!
//! i.e., X does not envy Y's bundle even after hypothetically removing the
//! single item X values least from Y's bundle. When Y's bundle is empty,
//! `cross_total = least_fav = 0` and the condition holds trivially.
//!
//! The checker is a pure predicate over a fixed-shape totals record. It is
//! evaluated against *hypothetical* post-commit totals before any mutation
//! occurs; a failing check never touches the ledger.

use serde::{Deserialize, Serialize};

/// The six quantities the EFX predicate is defined over.
///
/// Direction 1 is agent 1 inspecting agent 2's bundle; direction 2 is the
/// mirror image. `least_fav_*` is 0 when the inspected bundle is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfxTotals {
    /// Agent 1's valuation of its own bundle
    pub self_total_1: i64,

    /// Agent 1's valuation of agent 2's bundle
    pub cross_total_1: i64,

    /// Agent 1's least-valued item within agent 2's bundle (0 if empty)
    pub least_fav_1: i64,

    /// Agent 2's valuation of its own bundle
    pub self_total_2: i64,

    /// Agent 2's valuation of agent 1's bundle
    pub cross_total_2: i64,

    /// Agent 2's least-valued item within agent 1's bundle (0 if empty)
    pub least_fav_2: i64,
}

/// Per-direction verdict of one EFX evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfxEvaluation {
    /// Agent 1 envies agent 2's bundle beyond the EFX bound
    pub agent1_envies: bool,

    /// Agent 2 envies agent 1's bundle beyond the EFX bound
    pub agent2_envies: bool,
}

impl EfxEvaluation {
    /// True when neither direction is violated.
    pub fn holds(&self) -> bool {
        !self.agent1_envies && !self.agent2_envies
    }

    /// True when at least one direction is violated.
    pub fn violated(&self) -> bool {
        !self.holds()
    }
}

/// Evaluate the EFX predicate over a totals snapshot.
///
/// Pure and side-effect-free: calling it any number of times on the same
/// snapshot yields the same verdict and mutates nothing.
///
/// # Example
/// ```
/// use efx_simulator_core_rs::{evaluate, EfxTotals};
///
/// let totals = EfxTotals {
///     self_total_1: 5,
///     cross_total_1: 9,
///     least_fav_1: 9,
///     self_total_2: 9,
///     cross_total_2: 5,
///     least_fav_2: 5,
/// };
/// assert!(evaluate(&totals).holds());
/// ```
pub fn evaluate(totals: &EfxTotals) -> EfxEvaluation {
    EfxEvaluation {
        agent1_envies: totals.self_total_1 < totals.cross_total_1 - totals.least_fav_1,
        agent2_envies: totals.self_total_2 < totals.cross_total_2 - totals.least_fav_2,
    }
}
