//! FFI module - Python bindings via PyO3
//!
//! Exposes the engine to Python notebooks and scripts. The boundary is
//! minimal: the engine is constructed from plain dicts or a seeded scenario,
//! and results come back as dicts/lists of primitives.

pub mod engine;
