//! Growth simulation engine.
//!
//! Data flows downward: driver → round executor → trade resolver. Completed
//! rounds accumulate into a timeline that the summary aggregator reads once.

pub mod driver;
pub mod monte_carlo;
pub mod round;
pub mod summary;
pub mod trade;

pub use driver::{run, run_with_rng, GrowthSimulator};
pub use monte_carlo::{simulate_batch, BatchConfig, BatchResult};
pub use round::run_round;
pub use summary::summarize;
pub use trade::resolve_trade;
