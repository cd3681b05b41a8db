use crate::decider::GWEI;
use eyre::{eyre, Result, WrapErr};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

/// Environment variable holding the JSON-RPC endpoint of the node
pub const RPC_URL_ENV: &str = "HSK_BLOCKCHAIN_RPC_URL";

/// Default price in wei (5 gwei), used as the static price or the fallback
pub const DEFAULT_GAS_PRICE_WEI: u64 = 5 * GWEI;

/// Default per-request timeout towards the node
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Which decider the service runs with
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeciderMode {
    /// Always answer the configured price
    Static,
    /// Ask the node, answer the configured price when that fails
    GasStation,
}

impl FromStr for DeciderMode {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(DeciderMode::Static),
            "gas_station" | "gasstation" | "gas-station" => Ok(DeciderMode::GasStation),
            other => Err(eyre!("Unknown gas price mode: {other}")),
        }
    }
}

/// Endpoint settings for the node-backed decider
#[derive(Debug, Deserialize, Clone)]
pub struct GasStationConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Upper bound on a single request to the node
    pub timeout: Duration,
}

impl GasStationConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Service configuration structure
///
/// Everything the binary needs to build a decider and serve it. Values come
/// from environment variables with defaults, read once at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Host address to bind the server to (default: 127.0.0.1)
    pub host: String,

    /// Port to listen on (default: 8080)
    pub port: u16,

    /// Decider variant to construct
    pub mode: DeciderMode,

    /// Static price, or the fallback price in gas station mode, in wei
    pub gas_price_wei: Decimal,

    /// Node endpoint used in gas station mode
    pub gas_station: GasStationConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// * `HOST` - Server host address (default: "127.0.0.1")
    /// * `PORT` - Server port (default: 8080)
    /// * `GAS_PRICE_MODE` - `static` or `gas_station` (default: "gas_station")
    /// * `GAS_PRICE_WEI` - Static or fallback price in wei (default: 5 gwei)
    /// * `HSK_BLOCKCHAIN_RPC_URL` - Node RPC URL (default: "http://localhost:8545")
    /// * `RPC_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        let timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_RPC_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .wrap_err("RPC_TIMEOUT_SECS must be a whole number of seconds")?;

        let gas_price_wei = match env::var("GAS_PRICE_WEI") {
            Ok(raw) => Decimal::from_str(raw.trim())
                .wrap_err_with(|| format!("GAS_PRICE_WEI is not a decimal amount: {raw}"))?,
            Err(_) => Decimal::from(DEFAULT_GAS_PRICE_WEI),
        };
        if gas_price_wei.is_sign_negative() {
            return Err(eyre!("GAS_PRICE_WEI must not be negative"));
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()?,
            mode: env::var("GAS_PRICE_MODE")
                .unwrap_or_else(|_| "gas_station".to_string())
                .parse()?,
            gas_price_wei,
            gas_station: GasStationConfig::new(
                env::var(RPC_URL_ENV).unwrap_or_else(|_| "http://localhost:8545".to_string()),
            )
            .with_timeout(Duration::from_secs(timeout_secs)),
        })
    }
}
