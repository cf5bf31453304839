//! Scenario generation: seeded random valuation tables.
//!
//! Valuation tables come either as fixed literals (tests, CLI `--table`) or
//! from this module's pseudo-random generator. All generation is
//! deterministic based on the RNG seed: same seed + same config → same
//! table → same reveal order → same allocation trace.
//!
//! # Example
//!
//! ```
//! use efx_simulator_core_rs::scenario::{self, ScenarioConfig};
//!
//! let config = ScenarioConfig {
//!     num_items: 10,
//!     seed: 42,
//!     ..ScenarioConfig::default()
//! };
//!
//! let table = scenario::generate(&config).unwrap();
//! assert_eq!(table.len(), 10);
//! assert_eq!(table.items()[0].id, "g1");
//! ```

use crate::models::valuation::{ItemValuation, ValuationError, ValuationTable};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Configuration for one randomly generated scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Number of items in the universe
    pub num_items: usize,

    /// RNG seed (reproducibility anchor for the whole run)
    pub seed: u64,

    /// Minimum valuation, inclusive
    pub min_value: i64,

    /// Maximum valuation, inclusive
    pub max_value: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_items: 10,
            seed: 42,
            min_value: 1,
            max_value: 100,
        }
    }
}

/// Generate a valuation table from a scenario config.
///
/// Items are named `g1..gN`. Both agents' valuations are drawn independently
/// and uniformly from `[min_value, max_value]` using the seeded xorshift64*
/// generator.
///
/// # Errors
/// `ValuationError::EmptyItemSet` when `num_items` is 0. Range bounds are
/// asserted (`min_value` must not exceed `max_value`, and must be
/// non-negative so the table validation cannot fail on sign).
pub fn generate(config: &ScenarioConfig) -> Result<ValuationTable, ValuationError> {
    assert!(
        config.min_value >= 0 && config.min_value <= config.max_value,
        "value range must be non-negative and ordered"
    );

    let mut rng = RngManager::new(config.seed);
    let mut items = Vec::with_capacity(config.num_items);

    for i in 0..config.num_items {
        let value_1 = rng.range(config.min_value, config.max_value + 1);
        let value_2 = rng.range(config.min_value, config.max_value + 1);
        items.push(ItemValuation::new(format!("g{}", i + 1), value_1, value_2));
    }

    ValuationTable::new(items)
}
