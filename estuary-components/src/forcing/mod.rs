//! Exogenous drivers of the estuary
//!
//! Each process is a pure function of time, configuration and the current state,
//! and reports its effect as a separate [`Tendency`](estuary_core::state::Tendency).

pub mod biology;
pub mod gas_exchange;
pub mod ocean;
pub mod river;
pub mod tide;

pub use biology::Biology;
pub use gas_exchange::GasExchange;
pub use ocean::OceanExchange;
pub use river::RiverInflow;
pub use tide::Tide;

use estuary_core::constants::MEAN_DEPTH;
use estuary_core::timeseries::FloatValue;

/// Depth of the water column for a given tidal height
/// unit: m
pub fn water_depth(tidal_height: FloatValue) -> FloatValue {
    MEAN_DEPTH + tidal_height
}
