// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

//! fasttrack - Fast-tracking portfolio growth simulator.
//!
//! Simulates successive rounds of capital deployment across a fixed number of
//! tokens until a target amount is reached, capital is exhausted, or a round
//! cap is hit. Each round samples per-token outcomes and liquidates winners
//! down a sequential take-profit ladder.
//!
//! - Single runs via [`crate::simulation::run`] / [`crate::simulation::GrowthSimulator`]
//! - Injectable, seedable randomness ([`crate::core::RngSource`])
//! - Monte Carlo batch projection ([`crate::simulation::simulate_batch`])
//! - Optional Python bindings (feature `python`)

pub mod core;
pub mod logging;
#[cfg(feature = "python")]
pub mod python;
pub mod simulation;

pub use crate::core::{
    GrowthError, ProfitLevel, Result, RngSource, Round, SimulationConfig, SimulationResult,
    Summary, TerminationReason, Trade, TradeOutcome,
};
pub use crate::simulation::{run, run_with_rng, simulate_batch, BatchConfig, GrowthSimulator};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn _fasttrack(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register config classes
    m.add_class::<python::bindings::PySimulationConfig>()?;

    // Register result classes
    m.add_class::<python::bindings::PySimulationResult>()?;
    m.add_class::<python::bindings::PySimulationSummary>()?;
    m.add_class::<python::bindings::PyBatchResult>()?;

    // Register simulation functions
    m.add_function(wrap_pyfunction!(python::bindings::run_growth_simulation, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::run_growth_simulation_json, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::simulate_growth_batch, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::init_logging, m)?)?;

    Ok(())
}
