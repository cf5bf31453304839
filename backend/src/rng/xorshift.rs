//! xorshift64* random number generator
//!
//! Deterministic 64-bit PRNG with good statistical quality for simulation
//! use. Same seed → same sequence, which is what makes scenario generation
//! reproducible: the seed fixes the valuation table, the table fixes the
//! reveal order, and the reveal order fixes the whole allocation trace.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use efx_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let bounded = rng.range(1, 101); // [1, 101)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is promoted to 1 (xorshift requirement: the all-zero
    /// state is a fixed point).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64, advancing the internal state.
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random value in `[min, max)`.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Current RNG state (for replay and determinism assertions).
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
