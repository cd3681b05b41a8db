use crate::{
    config::{Config, DeciderMode, GasStationConfig},
    error::DeciderError,
    models::{
        jsonrpc::EstimateGasCall,
        quantity::{parse_decimal, parse_int},
    },
    rpc::RpcClient,
};
use alloy_primitives::I256;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Gas unit constants
pub const GWEI: u64 = 1_000_000_000;

/// Gas usage reported when it was not, or could not be, evaluated
pub const GAS_USED_UNKNOWN: I256 = I256::MINUS_ONE;

/// Outcome of a pricing decision
///
/// Both variants carry a usable value. `Degraded` additionally says why the
/// value is a fallback rather than the real answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<T> {
    Resolved(T),
    Degraded { value: T, reason: DeciderError },
}

impl<T> Decision<T> {
    pub fn value(&self) -> &T {
        match self {
            Decision::Resolved(value) | Decision::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Decision::Resolved(value) | Decision::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Decision::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&DeciderError> {
        match self {
            Decision::Resolved(_) => None,
            Decision::Degraded { reason, .. } => Some(reason),
        }
    }

    fn from_result(result: Result<T, DeciderError>, fallback: T) -> Self {
        match result {
            Ok(value) => Decision::Resolved(value),
            Err(reason) => Decision::Degraded {
                value: fallback,
                reason,
            },
        }
    }
}

/// Strategy for choosing a gas price and estimating gas usage
///
/// Implementations never fail: every problem is folded into a fallback value.
/// Use the `decide_*` methods to see whether that happened, or the plain
/// methods when only the number matters.
#[async_trait]
pub trait GasPriceDecider: Send + Sync {
    /// Short name of the strategy, for logs and health output
    fn name(&self) -> &'static str;

    /// Gas price in wei together with how it was obtained
    async fn decide_gas_price(&self) -> Decision<Decimal>;

    /// Estimated gas of a call together with how it was obtained
    async fn decide_gas_used(&self, from: &str, to: &str, data: &str) -> Decision<I256>;

    async fn gas_price_in_wei(&self) -> Decimal {
        self.decide_gas_price().await.into_value()
    }

    /// Estimated gas of a call, or [`GAS_USED_UNKNOWN`]
    async fn evaluate_gas_used(&self, from: &str, to: &str, data: &str) -> I256 {
        self.decide_gas_used(from, to, data).await.into_value()
    }
}

/// Always answers the configured price and never estimates gas usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticGasPriceDecider {
    price_in_wei: Decimal,
}

impl StaticGasPriceDecider {
    pub fn new(price_in_wei: Decimal) -> Self {
        Self { price_in_wei }
    }
}

#[async_trait]
impl GasPriceDecider for StaticGasPriceDecider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn decide_gas_price(&self) -> Decision<Decimal> {
        Decision::Resolved(self.price_in_wei)
    }

    async fn decide_gas_used(&self, _from: &str, _to: &str, _data: &str) -> Decision<I256> {
        Decision::Degraded {
            value: GAS_USED_UNKNOWN,
            reason: DeciderError::NotEvaluated,
        }
    }
}

/// Asks a JSON-RPC node for the gas price and gas estimates
///
/// Whenever the node cannot give a usable answer the configured fallback
/// price (or [`GAS_USED_UNKNOWN`] for estimates) is returned instead. Nothing
/// fetched is kept between calls.
#[derive(Debug, Clone)]
pub struct GasStationDecider {
    fallback_gas_price_in_wei: Decimal,
    client: RpcClient,
}

impl GasStationDecider {
    pub fn new(fallback_gas_price_in_wei: Decimal, config: &GasStationConfig) -> Self {
        Self {
            fallback_gas_price_in_wei,
            client: RpcClient::new(config),
        }
    }

    async fn fetch_gas_price(&self) -> Result<Decimal, DeciderError> {
        let result = self.client.call::<()>("eth_gasPrice", None).await?;
        Ok(parse_decimal(&result)?)
    }

    async fn fetch_gas_used(&self, call: EstimateGasCall) -> Result<I256, DeciderError> {
        let result = self.client.call("eth_estimateGas", Some([call])).await?;
        Ok(parse_int(&result)?)
    }
}

#[async_trait]
impl GasPriceDecider for GasStationDecider {
    fn name(&self) -> &'static str {
        "gas_station"
    }

    #[instrument(skip(self), fields(rpc_url = self.client.rpc_url()))]
    async fn decide_gas_price(&self) -> Decision<Decimal> {
        let decision = Decision::from_result(
            self.fetch_gas_price().await,
            self.fallback_gas_price_in_wei,
        );
        match &decision {
            Decision::Resolved(price) => debug!("Node gas price: {} wei", price),
            Decision::Degraded { value, reason } => {
                warn!("Using fallback gas price {} wei: {}", value, reason)
            }
        }
        decision
    }

    #[instrument(skip(self, data), fields(rpc_url = self.client.rpc_url()))]
    async fn decide_gas_used(&self, from: &str, to: &str, data: &str) -> Decision<I256> {
        let call = EstimateGasCall {
            from: from.to_string(),
            to: to.to_string(),
            data: data.to_string(),
        };
        let decision = Decision::from_result(self.fetch_gas_used(call).await, GAS_USED_UNKNOWN);
        match &decision {
            Decision::Resolved(gas) => debug!("Node gas estimate: {}", gas),
            Decision::Degraded { reason, .. } => warn!("Gas usage not evaluated: {}", reason),
        }
        decision
    }
}

/// Build the decider selected by the configuration
pub fn from_config(config: &Config) -> Arc<dyn GasPriceDecider> {
    match config.mode {
        DeciderMode::Static => {
            info!("Using static gas price of {} wei", config.gas_price_wei);
            Arc::new(StaticGasPriceDecider::new(config.gas_price_wei))
        }
        DeciderMode::GasStation => {
            info!(
                "Using gas station at {} with fallback of {} wei",
                config.gas_station.rpc_url, config.gas_price_wei
            );
            Arc::new(GasStationDecider::new(config.gas_price_wei, &config.gas_station))
        }
    }
}
