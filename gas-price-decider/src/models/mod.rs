//! Data models used throughout the crate
//!
//! JSON-RPC wire structures and the integer quantity parsing applied to
//! node answers.

// JSON-RPC protocol data structures
pub mod jsonrpc;

// Auto-base integer quantities
pub mod quantity;

pub use quantity::{hex_to_dec, hex_to_int};
