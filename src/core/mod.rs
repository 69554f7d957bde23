//! Core types and utilities for fasttrack.

pub mod error;
pub mod rng;
pub mod types;

pub use error::{GrowthError, Result};
pub use rng::{RngSource, TradeStream, TradeStreams, UniformSource, Xoshiro256};
pub use types::*;
