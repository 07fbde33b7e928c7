//! Python bindings (enabled with the `pyo3` feature)
//!
//! Lets the charting notebook call the core directly with lists of dicts
//! (one dict per log row or scenario).

pub mod analyzer;
pub mod types;
