//! PyO3 function bindings for fasttrack.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::core::rng::RngSource;
use crate::core::types::{
    ExecutionMode, ProfitLevel, SimulationConfig, SimulationResult, Summary, DEFAULT_BASE_PRICE,
    DEFAULT_MAX_ROUNDS,
};
use crate::logging;
use crate::simulation::{monte_carlo, GrowthSimulator};

use super::numpy_bridge::*;

// ============================================================================
// Configuration Classes
// ============================================================================

/// Python-exposed simulation configuration.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySimulationConfig {
    #[pyo3(get, set)]
    pub initial_amount: f64,
    #[pyo3(get, set)]
    pub target_amount: f64,
    #[pyo3(get, set)]
    pub stop_loss_pct: f64,
    #[pyo3(get, set)]
    pub num_tokens: usize,
    #[pyo3(get, set)]
    pub success_probability: f64,
    #[pyo3(get, set)]
    pub base_price: f64,
    #[pyo3(get, set)]
    pub max_rounds: usize,
    #[pyo3(get, set)]
    pub parallel: bool,
    profit_levels: Vec<ProfitLevel>,
}

#[pymethods]
impl PySimulationConfig {
    #[new]
    #[pyo3(signature = (initial_amount=1000.0, target_amount=10000.0, stop_loss_pct=15.0, num_tokens=3, success_probability=50.0, parallel=false))]
    fn new(
        initial_amount: f64,
        target_amount: f64,
        stop_loss_pct: f64,
        num_tokens: usize,
        success_probability: f64,
        parallel: bool,
    ) -> Self {
        Self {
            initial_amount,
            target_amount,
            stop_loss_pct,
            num_tokens,
            success_probability,
            base_price: DEFAULT_BASE_PRICE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            parallel,
            profit_levels: Vec::new(),
        }
    }

    /// Append a profit level.
    fn add_profit_level(&mut self, sell_percentage: f64, price_increase_pct: f64) {
        self.profit_levels.push(ProfitLevel::new(sell_percentage, price_increase_pct));
    }

    /// Replace all profit levels from parallel arrays.
    fn set_profit_levels(
        &mut self,
        sell_percentages: PyReadonlyArray1<f64>,
        price_increase_pcts: PyReadonlyArray1<f64>,
    ) -> PyResult<()> {
        let sells = numpy_to_vec_f64(sell_percentages)?;
        let increases = numpy_to_vec_f64(price_increase_pcts)?;
        if sells.len() != increases.len() {
            return Err(pyo3::exceptions::PyValueError::new_err(format!(
                "profit level arrays differ in length: {} vs {}",
                sells.len(),
                increases.len()
            )));
        }
        self.profit_levels =
            sells.into_iter().zip(increases).map(|(s, p)| ProfitLevel::new(s, p)).collect();
        Ok(())
    }

    /// Remove all profit levels.
    fn clear_profit_levels(&mut self) {
        self.profit_levels.clear();
    }

    /// Profit levels as (sell_percentage, price_increase_pct) tuples.
    fn profit_levels(&self) -> Vec<(f64, f64)> {
        self.profit_levels.iter().map(|l| (l.sell_percentage, l.price_increase_pct)).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(initial={}, target={}, tokens={}, levels={})",
            self.initial_amount,
            self.target_amount,
            self.num_tokens,
            self.profit_levels.len()
        )
    }
}

impl From<&PySimulationConfig> for SimulationConfig {
    fn from(py_config: &PySimulationConfig) -> Self {
        SimulationConfig {
            initial_amount: py_config.initial_amount,
            target_amount: py_config.target_amount,
            stop_loss_pct: py_config.stop_loss_pct,
            num_tokens: py_config.num_tokens,
            success_probability: py_config.success_probability,
            profit_levels: py_config.profit_levels.clone(),
            base_price: py_config.base_price,
            max_rounds: py_config.max_rounds,
            execution: if py_config.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            },
        }
    }
}

// ============================================================================
// Result Classes
// ============================================================================

/// Python-exposed simulation summary.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySimulationSummary {
    #[pyo3(get)]
    pub final_amount: f64,
    #[pyo3(get)]
    pub total_growth_pct: f64,
    #[pyo3(get)]
    pub rounds_required: usize,
    #[pyo3(get)]
    pub average_round_growth_pct: f64,
    #[pyo3(get)]
    pub achieved_target: bool,
    #[pyo3(get)]
    pub termination: String,
    #[pyo3(get)]
    pub total_trades: usize,
    #[pyo3(get)]
    pub win_rate_pct: f64,
    #[pyo3(get)]
    pub peak_amount: f64,
    #[pyo3(get)]
    pub max_drawdown_pct: f64,
}

impl From<&Summary> for PySimulationSummary {
    fn from(summary: &Summary) -> Self {
        Self {
            final_amount: summary.final_amount,
            total_growth_pct: summary.total_growth_pct,
            rounds_required: summary.rounds_required,
            average_round_growth_pct: summary.average_round_growth_pct,
            achieved_target: summary.achieved_target,
            termination: format!("{:?}", summary.termination),
            total_trades: summary.total_trades,
            win_rate_pct: summary.win_rate_pct,
            peak_amount: summary.peak_amount,
            max_drawdown_pct: summary.max_drawdown_pct,
        }
    }
}

#[pymethods]
impl PySimulationSummary {
    fn __repr__(&self) -> String {
        format!(
            "SimulationSummary(final={:.2}, growth={:.2}%, rounds={}, achieved={})",
            self.final_amount, self.total_growth_pct, self.rounds_required, self.achieved_target
        )
    }
}

/// Python-exposed simulation result.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySimulationResult {
    #[pyo3(get)]
    pub summary: PySimulationSummary,
    #[pyo3(get)]
    pub seed: Option<u64>,
    inner: SimulationResult,
}

#[pymethods]
impl PySimulationResult {
    /// Capital after each round as numpy array, prefixed with the initial amount.
    fn capital_curve<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.capital_curve())
    }

    /// Full timeline as JSON.
    fn to_json(&self) -> PyResult<String> {
        Ok(self.inner.to_json()?)
    }

    fn __len__(&self) -> usize {
        self.inner.timeline.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationResult(rounds={}, final={:.2}, achieved={})",
            self.summary.rounds_required, self.summary.final_amount, self.summary.achieved_target
        )
    }
}

impl From<SimulationResult> for PySimulationResult {
    fn from(result: SimulationResult) -> Self {
        Self {
            summary: PySimulationSummary::from(&result.summary),
            seed: result.seed,
            inner: result,
        }
    }
}

/// Python-exposed batch projection result.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyBatchResult {
    #[pyo3(get)]
    pub simulations: usize,
    #[pyo3(get)]
    pub target_probability: f64,
    #[pyo3(get)]
    pub bankruptcy_probability: f64,
    #[pyo3(get)]
    pub round_limit_probability: f64,
    #[pyo3(get)]
    pub mean_rounds_to_target: Option<f64>,
    #[pyo3(get)]
    pub expected_growth_pct: f64,
    #[pyo3(get)]
    pub percentile_final_amounts: Vec<(f64, f64)>,
    final_amounts: Vec<f64>,
}

#[pymethods]
impl PyBatchResult {
    /// Sorted final amounts as numpy array.
    fn final_amounts<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.final_amounts.clone())
    }

    fn __repr__(&self) -> String {
        format!(
            "BatchResult(simulations={}, p_target={:.3}, p_bankrupt={:.3})",
            self.simulations, self.target_probability, self.bankruptcy_probability
        )
    }
}

impl From<monte_carlo::BatchResult> for PyBatchResult {
    fn from(result: monte_carlo::BatchResult) -> Self {
        Self {
            simulations: result.simulations,
            target_probability: result.target_probability,
            bankruptcy_probability: result.bankruptcy_probability,
            round_limit_probability: result.round_limit_probability,
            mean_rounds_to_target: result.mean_rounds_to_target,
            expected_growth_pct: result.expected_growth_pct,
            percentile_final_amounts: result.percentile_final_amounts,
            final_amounts: result.final_amounts,
        }
    }
}

// ============================================================================
// Simulation Functions
// ============================================================================

fn rng_for(seed: Option<u64>) -> RngSource {
    seed.map_or(RngSource::System, RngSource::deterministic)
}

/// Run one growth simulation.
#[pyfunction]
#[pyo3(signature = (config, seed=None))]
pub fn run_growth_simulation(
    py: Python<'_>,
    config: &PySimulationConfig,
    seed: Option<u64>,
) -> PyResult<PySimulationResult> {
    let config = SimulationConfig::from(config);
    let result = py.allow_threads(|| GrowthSimulator::new(&config)?.with_rng(rng_for(seed)).run())?;
    Ok(result.into())
}

/// Run one growth simulation from a JSON config, returning the result as JSON.
#[pyfunction]
#[pyo3(signature = (config_json, seed=None))]
pub fn run_growth_simulation_json(
    py: Python<'_>,
    config_json: &str,
    seed: Option<u64>,
) -> PyResult<String> {
    let config = SimulationConfig::from_json(config_json)?;
    let result = py.allow_threads(|| GrowthSimulator::new(&config)?.with_rng(rng_for(seed)).run())?;
    Ok(result.to_json()?)
}

/// Project many independent simulations.
#[pyfunction]
#[pyo3(signature = (config, n_simulations=1000, seed=42))]
pub fn simulate_growth_batch(
    py: Python<'_>,
    config: &PySimulationConfig,
    n_simulations: usize,
    seed: u64,
) -> PyResult<PyBatchResult> {
    let config = SimulationConfig::from(config);
    let batch = monte_carlo::BatchConfig { n_simulations, seed };
    let result = py.allow_threads(|| monte_carlo::simulate_batch(&config, &batch))?;
    Ok(result.into())
}

/// Install a tracing subscriber for the extension.
#[pyfunction]
#[pyo3(signature = (level="info", json=false))]
pub fn init_logging(level: &str, json: bool) -> PyResult<()> {
    Ok(logging::setup_logging(level, json)?)
}
