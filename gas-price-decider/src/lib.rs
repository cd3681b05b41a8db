// Export modules for the binary and integration tests
pub mod api;
pub mod config;
pub mod decider;
pub mod error;
pub mod logging;
pub mod models;
pub mod rpc;

pub use decider::{Decision, GasPriceDecider, GasStationDecider, StaticGasPriceDecider};
pub use error::DeciderError;
pub use models::{hex_to_dec, hex_to_int};
