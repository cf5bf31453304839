//! PyO3 wrapper for the allocation engine
//!
//! # Example (from Python)
//!
//! ```python
//! from efx_simulator_core_rs import AllocationEngine
//!
//! engine = AllocationEngine.from_valuations({"g1": (5, 5), "g2": (3, 9)})
//! summary = engine.run()
//! print(summary["assigned_1"], summary["allocated_count"])
//! print(engine.render_table())
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::engine::AllocationEngine as RustAllocationEngine;
use crate::models::valuation::{ItemValuation, ValuationTable};
use crate::report;
use crate::scenario::{self, ScenarioConfig};

/// Python wrapper for the Rust allocation engine.
#[pyclass(name = "AllocationEngine")]
pub struct PyAllocationEngine {
    inner: RustAllocationEngine,
}

impl PyAllocationEngine {
    fn wrap(table: ValuationTable) -> PyResult<Self> {
        let inner = RustAllocationEngine::new(table).map_err(|e| {
            PyErr::new::<PyRuntimeError, _>(format!("Failed to create engine: {}", e))
        })?;
        Ok(Self { inner })
    }
}

#[pymethods]
impl PyAllocationEngine {
    /// Create an engine from a `{item_id: (value_1, value_2)}` dict.
    ///
    /// Dict insertion order fixes the tie-break order, exactly as the
    /// table's insertion order does on the Rust side.
    #[staticmethod]
    fn from_valuations(values: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut items = Vec::with_capacity(values.len());
        for (key, value) in values.iter() {
            let id: String = key.extract()?;
            let (value_1, value_2): (i64, i64) = value.extract()?;
            items.push(ItemValuation::new(id, value_1, value_2));
        }

        let table = ValuationTable::new(items)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Self::wrap(table)
    }

    /// Create an engine over a seeded random scenario of `num_items` items.
    #[staticmethod]
    fn from_scenario(num_items: usize, seed: u64) -> PyResult<Self> {
        let config = ScenarioConfig {
            num_items,
            seed,
            ..ScenarioConfig::default()
        };
        let table = scenario::generate(&config)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Self::wrap(table)
    }

    /// Process the next reveal entry.
    ///
    /// Returns a dict with `index`, `item`, `track` and `outcome`, or None
    /// once the reveal order is exhausted.
    fn step(&mut self, py: Python<'_>) -> PyResult<Option<Py<PyDict>>> {
        let result = self
            .inner
            .step()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Step failed: {}", e)))?;

        match result {
            None => Ok(None),
            Some(step) => {
                let dict = PyDict::new_bound(py);
                dict.set_item("index", step.index)?;
                dict.set_item("item", step.item_id)?;
                dict.set_item("track", step.track.to_string())?;
                dict.set_item("outcome", step.outcome.to_string())?;
                Ok(Some(dict.unbind()))
            }
        }
    }

    /// Drive the engine to exhaustion and return the allocation summary.
    fn run(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let summary = self
            .inner
            .run()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Run failed: {}", e)))?;

        let dict = PyDict::new_bound(py);
        dict.set_item("assigned_1", summary.assigned_1)?;
        dict.set_item("assigned_2", summary.assigned_2)?;
        dict.set_item("deferred", summary.deferred)?;
        dict.set_item("allocated_count", summary.allocated_count)?;
        dict.set_item("num_items", summary.num_items)?;
        dict.set_item("self_total_1", summary.self_total_1)?;
        dict.set_item("self_total_2", summary.self_total_2)?;
        Ok(dict.unbind())
    }

    /// All trace rows recorded so far, as a list of dicts.
    fn trace_rows(&self, py: Python<'_>) -> PyResult<Py<PyList>> {
        let list = PyList::empty_bound(py);
        for row in self.inner.trace().rows() {
            let dict = PyDict::new_bound(py);
            dict.set_item("index", row.index)?;
            dict.set_item("item", row.item_id.clone())?;
            dict.set_item("track", row.track.to_string())?;
            dict.set_item("outcome", row.outcome.to_string())?;
            dict.set_item("home_check_violated", row.home_check_violated)?;
            dict.set_item("fallback_check_violated", row.fallback_check_violated)?;
            dict.set_item("u1_a1", row.totals.self_total_1)?;
            dict.set_item("u1_a2", row.totals.cross_total_1)?;
            dict.set_item("u2_a2", row.totals.self_total_2)?;
            dict.set_item("u2_a1", row.totals.cross_total_2)?;
            dict.set_item("least_fav_1", row.totals.least_fav_1)?;
            dict.set_item("least_fav_2", row.totals.least_fav_2)?;
            list.append(dict)?;
        }
        Ok(list.unbind())
    }

    /// The psql-style step table for the rows recorded so far.
    fn render_table(&self) -> String {
        report::render_table(self.inner.trace())
    }

    /// Next reveal position to process.
    fn position(&self) -> usize {
        self.inner.position()
    }

    /// Whether the reveal order is exhausted.
    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}
