pub mod config;
pub mod constants;
pub mod ivp;
pub mod state;
pub mod timeseries;

pub mod errors;
