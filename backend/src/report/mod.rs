//! Run reports and trace rendering.
//!
//! A `RunReport` is the machine-readable artifact of one completed run: a
//! unique run id, the allocation outcome counts, final totals, and a SHA-256
//! digest over the canonical JSON encoding of the trace rows. The digest is
//! the determinism witness — identical valuation table ⇒ identical trace ⇒
//! identical digest — and is what the determinism tests compare.
//!
//! `render_table` produces the human-readable psql-style step table with one
//! row per reveal.

use crate::engine::AllocationSummary;
use crate::models::trace::StepTrace;
use crate::scenario::ScenarioConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Machine-readable summary of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier (UUID v4; not part of the determinism digest)
    pub run_id: String,

    /// Scenario seed, when the table was generated rather than supplied
    pub seed: Option<u64>,

    /// Size of the item universe
    pub num_items: usize,

    /// Items committed to either agent
    pub allocated_count: usize,

    /// Items left deferred
    pub deferred_count: usize,

    /// Agent 1's valuation of its final bundle
    pub self_total_1: i64,

    /// Agent 2's valuation of its final bundle
    pub self_total_2: i64,

    /// SHA-256 hex digest over the canonical JSON of the trace rows
    pub trace_digest: String,
}

impl RunReport {
    /// Build a report from a finished run.
    pub fn new(
        summary: &AllocationSummary,
        trace: &StepTrace,
        config: Option<&ScenarioConfig>,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            seed: config.map(|c| c.seed),
            num_items: summary.num_items,
            allocated_count: summary.allocated_count,
            deferred_count: summary.deferred.len(),
            self_total_1: summary.self_total_1,
            self_total_2: summary.self_total_2,
            trace_digest: trace_digest(trace),
        }
    }
}

/// SHA-256 hex digest over the canonical JSON encoding of the trace rows.
///
/// Struct fields serialize in declaration order, so the encoding (and hence
/// the digest) is deterministic for a given trace.
pub fn trace_digest(trace: &StepTrace) -> String {
    let canonical =
        serde_json::to_string(trace.rows()).expect("trace rows always serialize");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Render the step trace as an aligned psql-style table.
///
/// Columns: reveal step, item, originating track, destination, the four
/// running totals, and both least-favorite values.
pub fn render_table(trace: &StepTrace) -> String {
    const HEADERS: [&str; 10] = [
        "Step", "Item", "TM", "To", "u1(A1)", "u1(A2)", "u2(A2)", "u2(A1)",
        "u1(A2) least", "u2(A1) least",
    ];

    let rows: Vec<[String; 10]> = trace
        .rows()
        .iter()
        .map(|row| {
            [
                (row.index + 1).to_string(),
                row.item_id.clone(),
                row.track.to_string(),
                row.outcome.to_string(),
                row.totals.self_total_1.to_string(),
                row.totals.cross_total_1.to_string(),
                row.totals.self_total_2.to_string(),
                row.totals.cross_total_2.to_string(),
                row.totals.least_fav_1.to_string(),
                row.totals.least_fav_2.to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 10] = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for w in widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };

    let format_row = |cells: &[String; 10]| {
        let mut line = String::from("|");
        for (&w, cell) in widths.iter().zip(cells.iter()) {
            line.push_str(&format!(" {:>width$} |", cell, width = w));
        }
        line
    };

    let header_cells: [String; 10] = HEADERS.map(String::from);
    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(&header_cells));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&separator);
    out.push('\n');
    out
}
